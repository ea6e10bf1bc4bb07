//! Builds the chain reader, gateway and wallet bundle used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use client_blockchain_core::{BlockchainConfig, ContractGateway, WalletProvider};
use client_blockchain_cosmwasm::{CosmWasmConfig, KeyWallet, LcdClient, WatchOnlyWallet};
use game_core::Address;
use runtime::GameClient;

use crate::config::ClientConfig;

/// Builder that assembles a [`GameClient`] from configuration.
///
/// Without an explicit wallet, a [`KeyWallet`] is derived from
/// `GAME_MNEMONIC` when one is configured. Otherwise a [`WatchOnlyWallet`]
/// for the configured address is used: reads work, transactions fail at
/// signing.
pub struct ClientBuilder {
    config: ClientConfig,
    wallet: Option<Arc<dyn WalletProvider>>,
}

impl ClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            wallet: None,
        }
    }

    /// Provide a signing wallet instead of the watch-only default.
    pub fn wallet(mut self, wallet: impl WalletProvider + 'static) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    /// Watch `address` instead of `GAME_WALLET_ADDRESS`.
    pub fn wallet_address(mut self, address: impl Into<Address>) -> Self {
        self.config.chain.wallet_address = Some(address.into());
        self
    }

    pub fn build(self) -> Result<ClientSetup> {
        let chain = &self.config.chain;
        chain
            .validate()
            .map_err(|e| anyhow!("Invalid {} configuration: {}", chain.network_name(), e))?;

        let http_client = reqwest::Client::builder()
            .timeout(self.config.http_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let reader = LcdClient::with_client(&chain.rest_url, http_client);

        let wallet = match self.wallet {
            Some(wallet) => wallet,
            None => default_wallet(chain, &reader)?,
        };
        let gateway = ContractGateway::new(reader, chain.contract(), self.config.fees.clone());

        let client = GameClient::builder()
            .config(self.config.runtime.clone())
            .gateway(gateway)
            .shared_wallet(wallet.clone())
            .chain_info(chain.chain_info())
            .build()
            .context("Failed to assemble game client")?;

        tracing::info!(
            network = chain.network_name(),
            chain_id = %chain.chain_id,
            rest = %chain.rest_url,
            contract = %chain.contract_address,
            "Game client ready"
        );

        Ok(ClientSetup {
            config: self.config,
            client,
            wallet,
        })
    }
}

/// Key wallet when a mnemonic is configured, watch-only otherwise.
fn default_wallet(chain: &CosmWasmConfig, reader: &LcdClient) -> Result<Arc<dyn WalletProvider>> {
    let Some(mnemonic) = &chain.mnemonic else {
        if chain.wallet_address.is_none() {
            tracing::warn!("No wallet address configured; connecting will fail");
        }
        return Ok(Arc::new(WatchOnlyWallet::new(chain.wallet_address.clone())));
    };

    let wallet = KeyWallet::from_mnemonic(mnemonic, &chain.bech32_prefix, reader.clone())
        .context("Failed to load signing key from GAME_MNEMONIC")?;
    if let Some(watched) = &chain.wallet_address {
        if watched != wallet.address() {
            bail!(
                "Wallet address {watched} does not match the mnemonic account {}",
                wallet.address()
            );
        }
    }
    tracing::info!(address = %wallet.address(), "Signing with mnemonic account");
    Ok(Arc::new(wallet))
}

/// Assembled client plus the pieces front-ends may still need.
pub struct ClientSetup {
    pub config: ClientConfig,
    pub client: GameClient,
    /// Same wallet the client connects through.
    pub wallet: Arc<dyn WalletProvider>,
}

#[cfg(test)]
mod tests {
    use client_blockchain_cosmwasm::Mnemonic;

    use super::*;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[tokio::test]
    async fn builds_a_disconnected_client_from_defaults() {
        let setup = ClientBuilder::new(ClientConfig::default())
            .wallet_address("shareledger1watcher")
            .build()
            .unwrap();
        assert!(!setup.client.is_connected());
        assert_eq!(setup.client.chain_info().chain_id, "ShareRing-KUD");
        assert_eq!(
            setup.config.chain.wallet_address,
            Some(Address::new("shareledger1watcher"))
        );

        let accounts = setup.wallet.accounts("ShareRing-KUD").await.unwrap();
        assert_eq!(accounts[0].address, Address::new("shareledger1watcher"));
    }

    #[tokio::test]
    async fn mnemonic_selects_the_signing_wallet() {
        let mut config = ClientConfig::default();
        config.chain.mnemonic = Some(Mnemonic::new(PHRASE));
        let setup = ClientBuilder::new(config).build().unwrap();

        let accounts = setup.wallet.accounts("ShareRing-KUD").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].address.as_str().starts_with("shareledger1"));

        let mut config = ClientConfig::default();
        config.chain.mnemonic = Some(Mnemonic::new(PHRASE));
        let err = ClientBuilder::new(config)
            .wallet_address("shareledger1somebodyelse")
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn rejects_invalid_chain_configuration() {
        let mut config = ClientConfig::default();
        config.chain.rest_url = "lcd.example.com".to_string();
        let err = ClientBuilder::new(config).build().err().unwrap();
        assert!(err.to_string().contains("REST"));
    }
}

//! CosmWasm chain configuration.

use std::env;

use client_blockchain_core::{BlockchainConfig, ChainInfo, Currency, TransportError};
use game_core::Address;

use crate::key_wallet::Mnemonic;

/// Networks with known endpoints and contract deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CosmWasmNetwork {
    /// Public testnet
    Testnet,
    /// Public mainnet
    Mainnet,
    /// Local single-node chain
    Local,
}

impl CosmWasmNetwork {
    pub fn default_chain_id(&self) -> &'static str {
        match self {
            CosmWasmNetwork::Testnet => "ShareRing-KUD",
            CosmWasmNetwork::Mainnet => "ShareRing-VoyagerNet",
            CosmWasmNetwork::Local => "shareledger-local",
        }
    }

    pub fn default_chain_name(&self) -> &'static str {
        match self {
            CosmWasmNetwork::Testnet => "Shareledger Public Testnet",
            CosmWasmNetwork::Mainnet => "Shareledger",
            CosmWasmNetwork::Local => "Shareledger Local",
        }
    }

    /// Testnet RPC goes through the local CORS proxy.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            CosmWasmNetwork::Testnet => "http://localhost:3001",
            CosmWasmNetwork::Mainnet => "https://rpc.explorer.shareri.ng",
            CosmWasmNetwork::Local => "http://127.0.0.1:26657",
        }
    }

    pub fn default_rest_url(&self) -> &'static str {
        match self {
            CosmWasmNetwork::Testnet => "https://lcd-testnet.shareri.ng",
            CosmWasmNetwork::Mainnet => "https://lcd.explorer.shareri.ng",
            CosmWasmNetwork::Local => "http://127.0.0.1:1317",
        }
    }

    /// Deployed guessing contract, if the network has one.
    pub fn default_contract(&self) -> Option<&'static str> {
        match self {
            CosmWasmNetwork::Testnet => {
                Some("shareledger1hyja4uyjktpeh0fxzuw2fmjudr85rk2qu98fa6nuh6d4qru9l0sscg22hg")
            }
            CosmWasmNetwork::Mainnet => {
                Some("shareledger157ls6j2f4u5sze23l4mlcasdys48qz97rhlytexhwumqdmwuf2pq8vrs2y")
            }
            CosmWasmNetwork::Local => None,
        }
    }
}

/// CosmWasm-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmWasmConfig {
    pub network: CosmWasmNetwork,
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_url: String,
    pub rest_url: String,
    /// Guessing contract address; empty when the network has no deployment.
    pub contract_address: String,
    /// Micro denomination used for fees and balances.
    pub denom: String,
    /// Display denomination shown to players.
    pub display_denom: String,
    pub coin_decimals: u32,
    pub bech32_prefix: String,
    /// Account used by the watch-only wallet.
    pub wallet_address: Option<Address>,
    /// Signing key phrase; when set the client can send transactions.
    pub mnemonic: Option<Mnemonic>,
}

impl CosmWasmConfig {
    pub const DEFAULT_DENOM: &'static str = "nshr";
    pub const DEFAULT_DISPLAY_DENOM: &'static str = "shr";
    pub const DEFAULT_DECIMALS: u32 = 9;
    pub const DEFAULT_PREFIX: &'static str = "shareledger";

    /// Configuration with the network's preset endpoints and contract.
    pub fn new(network: CosmWasmNetwork) -> Self {
        Self {
            network,
            chain_id: network.default_chain_id().to_string(),
            chain_name: network.default_chain_name().to_string(),
            rpc_url: network.default_rpc_url().to_string(),
            rest_url: network.default_rest_url().to_string(),
            contract_address: network.default_contract().unwrap_or_default().to_string(),
            denom: Self::DEFAULT_DENOM.to_string(),
            display_denom: Self::DEFAULT_DISPLAY_DENOM.to_string(),
            coin_decimals: Self::DEFAULT_DECIMALS,
            bech32_prefix: Self::DEFAULT_PREFIX.to_string(),
            wallet_address: None,
            mnemonic: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GAME_NETWORK` - Network name (testnet, mainnet, local) (default: testnet)
    /// - `GAME_CHAIN_ID` - Chain id (default: network preset)
    /// - `GAME_CHAIN_NAME` - Chain name shown by the wallet (default: network preset)
    /// - `GAME_RPC_URL` - Tendermint RPC endpoint (default: network preset)
    /// - `GAME_REST_URL` - LCD REST endpoint (default: network preset)
    /// - `GAME_CONTRACT_ADDRESS` - Guessing contract address (default: network preset)
    /// - `GAME_DENOM` - Micro denomination (default: nshr)
    /// - `GAME_DISPLAY_DENOM` - Display denomination (default: shr)
    /// - `GAME_COIN_DECIMALS` - Decimals between micro and display units (default: 9)
    /// - `GAME_BECH32_PREFIX` - Account address prefix (default: shareledger)
    /// - `GAME_WALLET_ADDRESS` - Address for the watch-only wallet
    /// - `GAME_MNEMONIC` - BIP39 phrase of a signing account (optional)
    pub fn from_env() -> Result<Self, TransportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TransportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let network = match read("GAME_NETWORK") {
            Some(name) => name.parse::<CosmWasmNetwork>().map_err(|_| {
                TransportError::Config(format!(
                    "Invalid GAME_NETWORK: {name}. Must be testnet, mainnet, or local"
                ))
            })?,
            None => CosmWasmNetwork::Testnet,
        };

        let mut config = Self::new(network);

        if let Some(chain_id) = read("GAME_CHAIN_ID") {
            config.chain_id = chain_id;
        }
        if let Some(chain_name) = read("GAME_CHAIN_NAME") {
            config.chain_name = chain_name;
        }
        if let Some(rpc_url) = read("GAME_RPC_URL") {
            config.rpc_url = rpc_url;
        }
        if let Some(rest_url) = read("GAME_REST_URL") {
            config.rest_url = rest_url;
        }
        if let Some(contract) = read("GAME_CONTRACT_ADDRESS") {
            config.contract_address = contract;
        }
        if let Some(denom) = read("GAME_DENOM") {
            config.denom = denom;
        }
        if let Some(display) = read("GAME_DISPLAY_DENOM") {
            config.display_denom = display;
        }
        if let Some(decimals) = read("GAME_COIN_DECIMALS") {
            config.coin_decimals = decimals.parse().map_err(|_| {
                TransportError::Config(format!("Invalid GAME_COIN_DECIMALS: {decimals}"))
            })?;
        }
        if let Some(prefix) = read("GAME_BECH32_PREFIX") {
            config.bech32_prefix = prefix;
        }
        config.wallet_address = read("GAME_WALLET_ADDRESS").map(Address::new);
        config.mnemonic = read("GAME_MNEMONIC").map(Mnemonic::new);

        Ok(config)
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }

    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract_address = contract.into();
        self
    }

    pub fn with_wallet_address(mut self, address: impl Into<Address>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }

    pub fn contract(&self) -> Address {
        Address::new(self.contract_address.clone())
    }

    /// Chain description for the wallet's chain-suggestion request.
    pub fn chain_info(&self) -> ChainInfo {
        let currency = Currency {
            coin_denom: self.display_denom.clone(),
            coin_minimal_denom: self.denom.clone(),
            coin_decimals: self.coin_decimals,
        };

        ChainInfo::cosmwasm(
            &self.chain_id,
            &self.chain_name,
            &self.rpc_url,
            &self.rest_url,
            currency,
            &self.bech32_prefix,
        )
    }
}

impl BlockchainConfig for CosmWasmConfig {
    fn network_name(&self) -> &str {
        match self.network {
            CosmWasmNetwork::Testnet => "testnet",
            CosmWasmNetwork::Mainnet => "mainnet",
            CosmWasmNetwork::Local => "local",
        }
    }

    fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn validate(&self) -> Result<(), String> {
        for (name, url) in [("RPC", &self.rpc_url), ("REST", &self.rest_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("Invalid {name} URL format: {url}"));
            }
        }

        if self.chain_id.is_empty() {
            return Err("Chain id cannot be empty".to_string());
        }

        if self.bech32_prefix.is_empty() {
            return Err("Bech32 prefix cannot be empty".to_string());
        }

        if self.contract_address.is_empty() {
            return Err(format!(
                "No contract deployed on {}; set GAME_CONTRACT_ADDRESS",
                self.network
            ));
        }
        if !self.contract_address.starts_with(&self.bech32_prefix) {
            return Err(format!(
                "Contract address {} does not use prefix {}",
                self.contract_address, self.bech32_prefix
            ));
        }

        if let Some(wallet) = &self.wallet_address {
            if !wallet.as_str().starts_with(&self.bech32_prefix) {
                return Err(format!(
                    "Wallet address {wallet} does not use prefix {}",
                    self.bech32_prefix
                ));
            }
        }

        // 10^decimals must fit comfortably in u128 amounts.
        if self.coin_decimals > 18 {
            return Err(format!("Coin decimals too large: {}", self.coin_decimals));
        }

        Ok(())
    }
}

impl Default for CosmWasmConfig {
    fn default() -> Self {
        Self::new(CosmWasmNetwork::Testnet)
    }
}

//! Key-backed wallet for terminals.
//!
//! Derives a secp256k1 key from a BIP39 mnemonic on the Cosmos HD path
//! (`m/44'/118'/0'/0/0`), signs contract executions in SIGN_MODE_DIRECT and
//! broadcasts them through the LCD endpoint.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use client_blockchain_core::{
    Account, ChainInfo, ExecuteRequest, KeystoreEvent, TransactionSigner, TxHash, WalletError,
    WalletProvider,
};
use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::tx::{self, Fee, Msg, SignDoc, SignerInfo};
use cosmrs::{AccountId, Coin};
use game_core::Address;
use tokio::sync::broadcast;

use crate::lcd::{AccountInfo, LcdClient};

/// HD path of the first account for coin type 118.
pub const COSMOS_HD_PATH: &str = "m/44'/118'/0'/0/0";

/// BIP39 phrase read from configuration. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(String);

impl Mnemonic {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    fn phrase(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mnemonic(..)")
    }
}

/// Wallet holding one private key.
///
/// The account never changes, so the key store channel stays silent; its
/// sender is kept so subscribers never observe a closed channel.
#[derive(Clone)]
pub struct KeyWallet {
    key: Arc<KeyMaterial>,
    lcd: LcdClient,
    keystore: broadcast::Sender<KeystoreEvent>,
}

struct KeyMaterial {
    secret: [u8; 32],
    address: Address,
}

impl KeyWallet {
    /// Derive the first account of `mnemonic` with bech32 `prefix`.
    pub fn from_mnemonic(
        mnemonic: &Mnemonic,
        prefix: &str,
        lcd: LcdClient,
    ) -> Result<Self, WalletError> {
        let phrase = bip32::Mnemonic::new(mnemonic.phrase().trim(), bip32::Language::English)
            .map_err(|e| WalletError::SignerUnavailable(format!("Invalid mnemonic: {e}")))?;
        let path: bip32::DerivationPath = COSMOS_HD_PATH
            .parse()
            .map_err(|e| WalletError::SignerUnavailable(format!("Invalid HD path: {e}")))?;
        let seed = phrase.to_seed("");
        let xprv = bip32::XPrv::derive_from_path(seed.as_bytes(), &path)
            .map_err(|e| WalletError::SignerUnavailable(format!("Key derivation failed: {e}")))?;

        Self::from_secret(xprv.to_bytes(), prefix, lcd)
    }

    /// Wallet for a raw 32-byte secp256k1 secret.
    pub fn from_secret(secret: [u8; 32], prefix: &str, lcd: LcdClient) -> Result<Self, WalletError> {
        let signing_key = signing_key(&secret)?;
        let account_id = signing_key
            .public_key()
            .account_id(prefix)
            .map_err(|e| WalletError::SignerUnavailable(format!("Invalid prefix {prefix}: {e}")))?;

        let (keystore, _) = broadcast::channel(1);
        Ok(Self {
            key: Arc::new(KeyMaterial {
                secret,
                address: Address::new(account_id.to_string()),
            }),
            lcd,
            keystore,
        })
    }

    pub fn address(&self) -> &Address {
        &self.key.address
    }
}

#[async_trait]
impl WalletProvider for KeyWallet {
    async fn suggest_chain(&self, info: &ChainInfo) -> Result<(), WalletError> {
        tracing::debug!(chain_id = %info.chain_id, "key wallet accepts chain");
        Ok(())
    }

    async fn enable(&self, _chain_id: &str) -> Result<(), WalletError> {
        Ok(())
    }

    async fn accounts(&self, _chain_id: &str) -> Result<Vec<Account>, WalletError> {
        Ok(vec![Account::new(self.key.address.clone())])
    }

    fn keystore_changes(&self) -> broadcast::Receiver<KeystoreEvent> {
        self.keystore.subscribe()
    }

    async fn signer(&self, chain_id: &str) -> Result<Arc<dyn TransactionSigner>, WalletError> {
        Ok(Arc::new(KeySigner {
            key: self.key.clone(),
            lcd: self.lcd.clone(),
            chain_id: chain_id.to_string(),
        }))
    }
}

/// Signs for one chain and broadcasts synchronously.
struct KeySigner {
    key: Arc<KeyMaterial>,
    lcd: LcdClient,
    chain_id: String,
}

#[async_trait]
impl TransactionSigner for KeySigner {
    async fn sign_and_broadcast(&self, request: ExecuteRequest) -> Result<TxHash, WalletError> {
        if request.sender != self.key.address {
            return Err(WalletError::SignerUnavailable(format!(
                "key belongs to {}, not {}",
                self.key.address, request.sender
            )));
        }

        let account = self
            .lcd
            .account(&request.sender)
            .await
            .map_err(|e| WalletError::Broadcast(format!("Failed to load account: {e}")))?;
        let tx_bytes = sign_execute(&self.key.secret, &self.chain_id, account, &request)?;

        let response = self
            .lcd
            .broadcast_tx(&tx_bytes)
            .await
            .map_err(|e| WalletError::Broadcast(e.to_string()))?;
        if response.code != 0 {
            return Err(WalletError::Broadcast(format!(
                "code {}: {}",
                response.code, response.raw_log
            )));
        }

        tracing::info!(txhash = %response.txhash, memo = %request.memo, "Transaction broadcast");
        Ok(TxHash(response.txhash))
    }
}

fn signing_key(secret: &[u8; 32]) -> Result<SigningKey, WalletError> {
    SigningKey::from_slice(secret)
        .map_err(|e| WalletError::SignerUnavailable(format!("Invalid private key: {e}")))
}

/// Encode, sign and serialize one `MsgExecuteContract`.
pub(crate) fn sign_execute(
    secret: &[u8; 32],
    chain_id: &str,
    account: AccountInfo,
    request: &ExecuteRequest,
) -> Result<Vec<u8>, WalletError> {
    let invalid = |what: &str, e: &dyn fmt::Display| {
        WalletError::SignerUnavailable(format!("Cannot build transaction, {what}: {e}"))
    };

    let signing_key = signing_key(secret)?;
    let sender: AccountId = request
        .sender
        .as_str()
        .parse()
        .map_err(|e| invalid("sender", &e))?;
    let contract: AccountId = request
        .contract
        .as_str()
        .parse()
        .map_err(|e| invalid("contract", &e))?;
    let funds = request
        .funds
        .iter()
        .map(|coin| Coin::new(coin.amount.get(), &coin.denom))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid("funds", &e))?;

    let msg = MsgExecuteContract {
        sender,
        contract,
        msg: request.msg.to_string().into_bytes(),
        funds,
    }
    .to_any()
    .map_err(|e| invalid("message", &e))?;
    let body = tx::Body::new(vec![msg], request.memo.as_str(), 0u32);

    let fee_coin = request
        .fee
        .amount
        .first()
        .ok_or_else(|| invalid("fee", &"no fee coin"))?;
    let fee_coin = Coin::new(fee_coin.amount.get(), &fee_coin.denom).map_err(|e| invalid("fee", &e))?;
    let auth_info = SignerInfo::single_direct(Some(signing_key.public_key()), account.sequence)
        .auth_info(Fee::from_amount_and_gas(fee_coin, request.fee.gas));

    let chain_id: cosmrs::tendermint::chain::Id =
        chain_id.parse().map_err(|e| invalid("chain id", &e))?;
    let sign_doc = SignDoc::new(&body, &auth_info, &chain_id, account.account_number)
        .map_err(|e| invalid("sign doc", &e))?;
    sign_doc
        .sign(&signing_key)
        .and_then(|raw| raw.to_bytes())
        .map_err(|e| invalid("signature", &e))
}

#[cfg(test)]
mod tests {
    use client_blockchain_core::FeeSchedule;
    use game_core::GameAction;

    use super::*;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn wallet() -> KeyWallet {
        KeyWallet::from_mnemonic(
            &Mnemonic::new(PHRASE),
            "shareledger",
            LcdClient::new("http://127.0.0.1:1"),
        )
        .unwrap()
    }

    #[test]
    fn mnemonic_is_never_printed() {
        assert_eq!(format!("{:?}", Mnemonic::new(PHRASE)), "Mnemonic(..)");
    }

    #[tokio::test]
    async fn derives_one_stable_account_per_prefix() {
        let first = wallet();
        let second = wallet();
        assert_eq!(first.address(), second.address());
        assert!(first.address().as_str().starts_with("shareledger1"));

        let accounts = first.accounts("ShareRing-KUD").await.unwrap();
        assert_eq!(accounts, vec![Account::new(first.address().clone())]);
    }

    #[test]
    fn rejects_invalid_phrases() {
        let err = KeyWallet::from_mnemonic(
            &Mnemonic::new("not a real phrase"),
            "shareledger",
            LcdClient::new("http://127.0.0.1:1"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, WalletError::SignerUnavailable(_)));
    }

    #[test]
    fn signed_execute_carries_funds_fee_and_sequence() {
        let wallet = wallet();
        let request = ExecuteRequest::for_action(
            &Address::new("shareledger1hyja4uyjktpeh0fxzuw2fmjudr85rk2qu98fa6nuh6d4qru9l0sscg22hg"),
            wallet.address(),
            &FeeSchedule::default(),
            &GameAction::Guess { number: 7 },
        )
        .unwrap();
        let account = AccountInfo {
            account_number: 12,
            sequence: 4,
        };

        let bytes = sign_execute(&wallet.key.secret, "ShareRing-KUD", account, &request).unwrap();
        let tx = cosmrs::Tx::from_bytes(&bytes).unwrap();

        assert_eq!(tx.body.memo, "Submit guess");
        assert_eq!(tx.auth_info.signer_infos[0].sequence, 4);
        assert_eq!(tx.auth_info.fee.gas_limit, 200_000);
        assert_eq!(tx.auth_info.fee.amount[0].amount, 10_000_000);

        let execute = MsgExecuteContract::from_any(&tx.body.messages[0]).unwrap();
        assert_eq!(execute.sender.to_string(), wallet.address().as_str());
        assert_eq!(execute.funds[0].amount, 15_000_000_000);
        assert_eq!(execute.funds[0].denom.to_string(), "nshr");
        let msg: serde_json::Value = serde_json::from_slice(&execute.msg).unwrap();
        assert_eq!(msg, serde_json::json!({"guess": {"number": 7}}));
    }

    #[tokio::test]
    async fn refuses_requests_for_another_sender() {
        let signer = wallet().signer("ShareRing-KUD").await.unwrap();
        let request = ExecuteRequest::for_action(
            &Address::new("shareledger1contract"),
            &Address::new("shareledger1someoneelse"),
            &FeeSchedule::default(),
            &GameAction::Guess { number: 1 },
        )
        .unwrap();
        assert!(matches!(
            signer.sign_and_broadcast(request).await,
            Err(WalletError::SignerUnavailable(_))
        ));
    }
}

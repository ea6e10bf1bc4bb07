//! Watch-only wallet for terminals.
//!
//! Exposes one configured address and never holds keys. Reads work normally;
//! any attempt to broadcast fails with `WalletError::SignerUnavailable`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_blockchain_core::{
    Account, ChainInfo, ExecuteRequest, KeystoreEvent, TransactionSigner, TxHash, WalletError,
    WalletProvider,
};
use game_core::Address;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct WatchOnlyWallet {
    address: Arc<Mutex<Option<Address>>>,
    keystore: broadcast::Sender<KeystoreEvent>,
}

impl WatchOnlyWallet {
    pub fn new(address: Option<Address>) -> Self {
        let (keystore, _) = broadcast::channel(8);
        Self {
            address: Arc::new(Mutex::new(address)),
            keystore,
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the watched address and notify subscribers.
    pub fn set_address(&self, address: Option<Address>) {
        *self
            .address
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = address;
        self.notify_keystore_change();
    }

    pub fn notify_keystore_change(&self) {
        // An error only means nobody is subscribed.
        let _ = self.keystore.send(KeystoreEvent::Changed);
    }
}

#[async_trait]
impl WalletProvider for WatchOnlyWallet {
    async fn suggest_chain(&self, info: &ChainInfo) -> Result<(), WalletError> {
        tracing::debug!(chain_id = %info.chain_id, "watch-only wallet accepts chain");
        Ok(())
    }

    async fn enable(&self, _chain_id: &str) -> Result<(), WalletError> {
        Ok(())
    }

    async fn accounts(&self, _chain_id: &str) -> Result<Vec<Account>, WalletError> {
        Ok(self.address().map(Account::new).into_iter().collect())
    }

    fn keystore_changes(&self) -> broadcast::Receiver<KeystoreEvent> {
        self.keystore.subscribe()
    }

    async fn signer(&self, _chain_id: &str) -> Result<Arc<dyn TransactionSigner>, WalletError> {
        let address = self.address().ok_or(WalletError::NoAccounts)?;
        Ok(Arc::new(WatchOnlySigner { address }))
    }
}

/// Signer stand-in that refuses to broadcast.
struct WatchOnlySigner {
    address: Address,
}

#[async_trait]
impl TransactionSigner for WatchOnlySigner {
    async fn sign_and_broadcast(&self, request: ExecuteRequest) -> Result<TxHash, WalletError> {
        Err(WalletError::SignerUnavailable(format!(
            "{} is watch-only, cannot send \"{}\"",
            self.address, request.memo
        )))
    }
}

#[cfg(test)]
mod tests {
    use client_blockchain_core::FeeSchedule;
    use game_core::GameAction;

    use super::*;

    #[tokio::test]
    async fn exposes_configured_address_but_never_signs() {
        let wallet = WatchOnlyWallet::new(Some(Address::new("shareledger1me")));
        let accounts = wallet.accounts("ShareRing-KUD").await.unwrap();
        assert_eq!(accounts, vec![Account::new("shareledger1me")]);

        let signer = wallet.signer("ShareRing-KUD").await.unwrap();
        let request = ExecuteRequest::for_action(
            &Address::new("contract"),
            &Address::new("shareledger1me"),
            &FeeSchedule::default(),
            &GameAction::Guess { number: 1 },
        )
        .unwrap();
        assert!(matches!(
            signer.sign_and_broadcast(request).await,
            Err(WalletError::SignerUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn address_change_notifies_subscribers() {
        let wallet = WatchOnlyWallet::new(None);
        assert!(wallet.accounts("c").await.unwrap().is_empty());
        assert!(matches!(wallet.signer("c").await, Err(WalletError::NoAccounts)));

        let mut changes = wallet.keystore_changes();
        wallet.set_address(Some(Address::new("shareledger1b")));
        assert_eq!(changes.recv().await.unwrap(), KeystoreEvent::Changed);
    }
}

//! Chain abstraction traits.
//!
//! This module defines a layered chain abstraction:
//! - Layer 0: ChainReader, TransactionSigner (pure infrastructure)
//! - Wallet: WalletProvider (accounts, chain enablement, signers)
//! - Layer 1: GameGateway (guessing contract domain)

use std::sync::Arc;

use async_trait::async_trait;
use game_core::{Address, Amount, BlockHeight, GameAction, GameState, Guess, RoundId};
use tokio::sync::broadcast;

use crate::types::{Account, ChainInfo, ExecuteRequest, FeeSchedule, KeystoreEvent, TxHash};

// ============================================================================
// Error Types
// ============================================================================

/// Transport layer errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Wallet errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet extension is not available")]
    ExtensionUnavailable,

    #[error("Wallet rejected chain {chain_id}: {reason}")]
    ChainRejected { chain_id: String, reason: String },

    #[error("Wallet is locked")]
    Locked,

    #[error("Wallet exposes no accounts")]
    NoAccounts,

    #[error("Wallet cannot sign transactions: {0}")]
    SignerUnavailable(String),

    #[error("Broadcast failed: {0}")]
    Broadcast(String),
}

impl WalletError {
    /// Errors after which the current session can no longer be trusted.
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::ExtensionUnavailable | Self::Locked | Self::NoAccounts)
    }
}

/// Contract gateway errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Malformed {operation} response: {reason}")]
    MalformedResponse {
        operation: &'static str,
        reason: String,
    },

    #[error("Execution rejected: {0}")]
    ExecutionRejected(String),
}

// ============================================================================
// Layer 0: Pure Infrastructure
// ============================================================================

/// Read-only chain access.
///
/// This trait knows nothing about the guessing contract.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Run a smart query against `contract` and return the raw JSON answer.
    async fn query_smart(
        &self,
        contract: &Address,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;

    /// Height of the most recent block.
    async fn latest_block_height(&self) -> Result<BlockHeight, TransportError>;

    /// Balance of `address` in `denom`; zero when the account holds none.
    async fn balance(&self, address: &Address, denom: &str) -> Result<Amount, TransportError>;

    /// Health check: verify connection to the chain.
    async fn health_check(&self) -> Result<(), TransportError> {
        self.latest_block_height().await.map(|_| ())
    }
}

/// Signs and broadcasts on behalf of one account.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_and_broadcast(&self, request: ExecuteRequest) -> Result<TxHash, WalletError>;
}

// ============================================================================
// Wallet
// ============================================================================

/// Browser-extension style wallet.
///
/// A session is valid only while the wallet keeps reporting the same first
/// account for the enabled chain.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Register the chain with the wallet.
    async fn suggest_chain(&self, info: &ChainInfo) -> Result<(), WalletError>;

    /// Ask the user to approve access to `chain_id`.
    async fn enable(&self, chain_id: &str) -> Result<(), WalletError>;

    /// Accounts currently exposed for `chain_id`, first one is active.
    async fn accounts(&self, chain_id: &str) -> Result<Vec<Account>, WalletError>;

    /// Subscribe to key store change notifications.
    fn keystore_changes(&self) -> broadcast::Receiver<KeystoreEvent>;

    /// Signer for the active account on `chain_id`.
    async fn signer(&self, chain_id: &str) -> Result<Arc<dyn TransactionSigner>, WalletError>;
}

// ============================================================================
// Layer 1: Game Domain
// ============================================================================

/// Typed access to the guessing contract.
#[async_trait]
pub trait GameGateway: Send + Sync {
    async fn get_game_state(&self) -> Result<GameState, GatewayError>;

    /// Guesses of the current round.
    async fn get_guesses(&self) -> Result<Vec<Guess>, GatewayError>;

    /// Guesses across every round.
    async fn get_all_guesses(&self) -> Result<Vec<Guess>, GatewayError>;

    /// Winners of `round_id`; empty when nobody guessed the target.
    async fn get_winner(&self, round_id: RoundId) -> Result<Vec<Address>, GatewayError>;

    async fn latest_block_height(&self) -> Result<BlockHeight, GatewayError>;

    /// Balance of `address` in the game denomination.
    async fn balance(&self, address: &Address) -> Result<Amount, GatewayError>;

    fn fees(&self) -> &FeeSchedule;

    /// Build, sign and broadcast `action` as `sender`.
    async fn execute(
        &self,
        signer: &dyn TransactionSigner,
        sender: &Address,
        action: GameAction,
    ) -> Result<TxHash, GatewayError>;
}

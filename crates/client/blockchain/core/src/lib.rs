//! Chain abstraction layer for the guessing game client.
//!
//! This crate provides a layered abstraction over a CosmWasm guessing contract.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: GameGateway (guessing contract domain)
//!          └── ContractGateway<R: ChainReader>
//!
//! Wallet:  WalletProvider ──signer()──> TransactionSigner
//!
//! Layer 0: ChainReader (pure infrastructure, no game knowledge)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{ContractGateway, FeeSchedule, GameGateway};
//!
//! let gateway = ContractGateway::new(reader, contract, FeeSchedule::default());
//! let state = gateway.get_game_state().await?;
//! let hash = gateway.execute(signer.as_ref(), &address, GameAction::Guess { number: 7 }).await?;
//! ```

pub mod gateway;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use gateway::ContractGateway;

// Re-export all traits
pub use traits::{
    ChainReader, GameGateway, GatewayError, TransactionSigner, TransportError, WalletError,
    WalletProvider,
};

// Re-export all types
pub use types::{
    Account, Bech32Config, Bip44, BlockchainConfig, ChainInfo, Coin, Currency, ExecuteRequest,
    Fee, FeeCurrency, FeeSchedule, GasPriceStep, KeystoreEvent, TxHash,
};

#[cfg(any(test, feature = "mock"))]
pub use mock::{CallCounts, MockGateway, MockWallet, QueryGate};

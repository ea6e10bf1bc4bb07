//! CosmWasm integration for the guessing game client.
//!
//! This crate connects the chain-agnostic traits of `client-blockchain-core`
//! to a Cosmos SDK chain running the guessing contract:
//! - Network presets and environment configuration
//! - LCD (REST) reader for smart queries, block height and balances
//! - Wallet chain-suggestion payload
//! - Mnemonic-backed wallet that signs and broadcasts through LCD
//! - Watch-only wallet for terminals without a key
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{ContractGateway, FeeSchedule, GameGateway};
//! use client_blockchain_cosmwasm::{CosmWasmConfig, LcdClient};
//!
//! let config = CosmWasmConfig::from_env()?;
//! let gateway = ContractGateway::new(
//!     LcdClient::new(&config.rest_url),
//!     config.contract(),
//!     FeeSchedule::default(),
//! );
//! let state = gateway.get_game_state().await?;
//! ```

pub mod config;
pub mod key_wallet;
pub mod lcd;
pub mod wallet;

pub use config::{CosmWasmConfig, CosmWasmNetwork};
pub use key_wallet::{KeyWallet, Mnemonic};
pub use lcd::{AccountInfo, LcdClient, TxResponse};
pub use wallet::WatchOnlyWallet;

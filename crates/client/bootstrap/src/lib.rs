//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading and client assembly (REST reader, contract
//! gateway, wallet) that can be reused by the CLI or any other front-end.
pub mod builder;
pub mod config;

pub use builder::{ClientBuilder, ClientSetup};
pub use config::ClientConfig;

//! Unified error types surfaced by the client API.
//!
//! Wraps validation, gateway and wallet failures so frontends can bubble them
//! up with consistent context. Every variant renders as a user-visible line.
use client_blockchain_core::{GatewayError, WalletError};
use game_core::ValidationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("the session ended before the request completed")]
    SessionEnded,

    #[error("client requires a {0} before building")]
    MissingComponent(&'static str),
}

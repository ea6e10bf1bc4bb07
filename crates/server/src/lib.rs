//! Browser-facing reverse proxy for a Tendermint RPC node.
//!
//! Browsers cannot call the node directly because of CORS and mixed content,
//! so requests under a path prefix are forwarded to a single upstream origin
//! with permissive CORS headers added to every response.

pub mod config;
pub mod error;
pub mod proxy;

pub use config::{ConfigError, ProxyConfig};
pub use error::{PROXY_FAILURE, ProxyError};
pub use proxy::{router, serve, serve_on};

//! RPC proxy binary.
//!
//! # Examples
//!
//! ```bash
//! # Forward http://127.0.0.1:3001/rpc/* to the testnet node
//! cargo run -p rpc-proxy
//!
//! # Local node, different prefix
//! PROXY_UPSTREAM=http://localhost:26657 PROXY_PATH_PREFIX=/api/proxy cargo run -p rpc-proxy
//! ```

use anyhow::{Context, Result};
use rpc_proxy::ProxyConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ProxyConfig::from_env().context("Failed to load proxy configuration")?;
    rpc_proxy::serve(config).await
}

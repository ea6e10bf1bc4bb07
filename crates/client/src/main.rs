//! Guessing game client binary.
//!
//! # Architecture
//!
//! This binary is the composition root that assembles:
//! 1. GameClient (gateway, wallet, workers) via the bootstrap ClientBuilder
//! 2. Frontend (UI) - CLI, GUI, etc.
//!
//! # Features
//!
//! - `frontend-cli`: Terminal commands (default)
//!
//! # Examples
//!
//! ```bash
//! # Current round for a watched address on testnet
//! GAME_WALLET_ADDRESS=shareledger1... cargo run -p guessing-client -- status
//!
//! # All-time leaderboard on mainnet
//! GAME_NETWORK=mainnet cargo run -p guessing-client -- leaderboard
//!
//! # Sign and broadcast a guess with a local key
//! GAME_MNEMONIC="word1 ... word12" cargo run -p guessing-client -- guess 42
//! ```

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    #[cfg(feature = "frontend-cli")]
    {
        run_cli().await?;
    }

    #[cfg(not(feature = "frontend-cli"))]
    {
        compile_error!("At least one frontend feature must be enabled (frontend-cli, ...)");
    }

    Ok(())
}

/// Run the CLI frontend.
#[cfg(feature = "frontend-cli")]
async fn run_cli() -> Result<()> {
    use clap::Parser;
    use client_blockchain_core::types::BlockchainConfig;
    use client_bootstrap::ClientConfig;
    use client_frontend_cli::{Cli, CliConfig, CliFrontend, FrontendConfig, logging};
    use guessing_client::Client;

    let cli = Cli::parse();

    // 1. Setup logging
    let _log_guard = logging::setup_logging(&logging::log_dir())?;

    // 2. Load configuration from environment
    let client_config = ClientConfig::from_env()?;
    let frontend_config = FrontendConfig::from_env();
    let cli_config = CliConfig::from_env();

    tracing::info!("Starting guessing game client");
    tracing::info!("Network: {}", client_config.chain.network_name());
    tracing::info!("Contract: {}", client_config.chain.contract_address);

    if cli.command.is_transaction() && client_config.chain.mnemonic.is_none() {
        tracing::warn!("GAME_MNEMONIC is not set; the transaction cannot be signed");
    }

    // 3. Assemble the game client
    let mut bootstrap = client_bootstrap::ClientBuilder::new(client_config);
    if let Some(address) = cli.address {
        bootstrap = bootstrap.wallet_address(address);
    }
    let setup = bootstrap.build()?;

    // 4. Build Frontend (independent layer)
    let frontend = CliFrontend::new(cli.command, frontend_config, cli_config);

    // 5. Build and run
    let client = Client::builder()
        .game(setup.client)
        .frontend(frontend)
        .build()?;

    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}

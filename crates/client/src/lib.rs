//! Top-level client composing the game client and a frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ GameClient (wallet session, polling workers, transactions)
//!   └─→ Frontend (UI layer - CLI, GUI, etc.)
//! ```
//!
//! # Separation of Concerns
//!
//! - **Client**: Composition root, lifecycle management
//! - **GameClient**: Session lifecycle, reconciliation, pre-flight checks, event emission
//! - **Frontend**: User interaction, event consumption, rendering (via GameClient only)

mod builder;

pub use builder::ClientBuilder;

// Re-export Frontend trait from client-frontend-core
pub use client_frontend_core::Frontend;

use anyhow::Result;
use runtime::GameClient;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. Client::builder() receives an assembled GameClient and a Frontend
/// 2. Client::run() transfers control to the frontend
/// 3. On frontend exit, any session left open is ended so its workers stop
pub struct Client {
    game: GameClient,
    frontend: Box<dyn Frontend>,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the client.
    ///
    /// # Errors
    ///
    /// Returns the frontend's error, if any.
    pub async fn run(self) -> Result<()> {
        let Client { game, mut frontend } = self;

        let result = frontend.run(game.clone()).await;

        if game.disconnect().await {
            tracing::debug!("Session closed after frontend exit");
        }

        result
    }
}

//! Client builder with dependency injection pattern.

use crate::{Client, Frontend};
use anyhow::{Context, Result};
use runtime::GameClient;

/// Builder for constructing a Client with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: GameClient and Frontend must be provided
/// - **Fail-fast validation**: Missing required fields cause build() to fail
/// - **Fluent API**: Chainable methods for ergonomic construction
#[derive(Default)]
pub struct ClientBuilder {
    game: Option<GameClient>,
    frontend: Option<Box<dyn Frontend>>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the game client (required).
    ///
    /// It should be assembled via `ClientBuilder` from the `client-bootstrap`
    /// crate.
    pub fn game(mut self, game: GameClient) -> Self {
        self.game = Some(game);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - GameClient is not set (required)
    /// - Frontend is not set (required)
    pub fn build(self) -> Result<Client> {
        let game = self
            .game
            .context("GameClient is required. Use .game() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client { game, frontend })
    }
}

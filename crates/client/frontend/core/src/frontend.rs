//! Trait describing a runnable client front-end.
use anyhow::Result;
use async_trait::async_trait;
use runtime::GameClient;

/// Frontend abstraction for UI layers.
///
/// Frontends talk to the game only through a [`GameClient`]:
/// - Subscribe to events (Snapshot, Session, Status)
/// - Connect or disconnect the wallet session
/// - Submit guesses and admin actions
/// - Read the current snapshot
///
/// Frontends do NOT own the background workers; those live behind the client
/// and stop when its session ends.
///
/// # Implementations
///
/// - `CliFrontend`: one-shot terminal commands plus a `watch` loop
///
/// # Example Implementation
///
/// ```no_run
/// use async_trait::async_trait;
/// use client_frontend_core::Frontend;
/// use runtime::{Event, GameClient, Topic};
/// use anyhow::Result;
///
/// struct MyFrontend;
///
/// #[async_trait]
/// impl Frontend for MyFrontend {
///     async fn run(&mut self, client: GameClient) -> Result<()> {
///         let mut status = client.subscribe(Topic::Status);
///         client.connect().await?;
///
///         while let Ok(event) = status.recv().await {
///             if let Event::Status(message) = event {
///                 println!("{}", message.text);
///             }
///         }
///
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Frontend: Send {
    /// Run the frontend until the user is done.
    ///
    /// # Errors
    ///
    /// Returns an error if the frontend encounters a fatal error.
    async fn run(&mut self, client: GameClient) -> Result<()>;
}

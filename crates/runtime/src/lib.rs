//! Client runtime for the on-chain guessing game.
//!
//! This crate wires a contract gateway and a wallet into a session-scoped
//! client. Consumers build a [`GameClient`], connect a wallet, read the
//! reconciled [`GameSnapshot`] and submit validated transactions, while
//! background workers keep the snapshot fresh and watch the wallet.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the client handle and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`session`] and [`snapshot`] hold the shared state workers read and write
//! - [`workers`] runs the state reconciler and the session guard
pub mod api;
pub mod events;
pub mod leaderboard;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod workers;

pub use api::{ClientError, Result};
pub use events::{
    DisconnectReason, Event, EventBus, SessionEvent, SnapshotEvent, StatusLevel, StatusMessage,
    Topic,
};
pub use leaderboard::load_leaderboard;
pub use runtime::{GameClient, GameClientBuilder, RuntimeConfig};
pub use session::{Session, SessionState, SessionToken};
pub use snapshot::{GameSnapshot, SnapshotStore};
pub use workers::RefreshOutcome;

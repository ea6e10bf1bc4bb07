//! Cross-frontend primitives for presenting the game.
//!
//! Houses the frontend trait, status message logging, event handling, and
//! view-model types that the CLI and future graphical clients can reuse.
pub mod config;
pub mod event;
pub mod frontend;
pub mod message;
pub mod view_model;

pub use config::{FrontendConfig, MessageConfig};
pub use event::{EventConsumer, EventImpact, StatusLogConsumer};
pub use frontend::Frontend;
pub use message::{MessageEntry, MessageLevel, MessageLog};
pub use view_model::{GameView, LeaderboardRow, display_amount, leaderboard_rows};

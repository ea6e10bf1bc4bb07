//! Event types for different topics.

use core::fmt;

use game_core::{Address, BlockHeight, RoundId};

/// Events related to snapshot replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEvent {
    /// A refresh completed and replaced the snapshot.
    Refreshed {
        round_id: RoundId,
        block_height: BlockHeight,
        /// The chain reached `round_end` since the previous snapshot.
        round_end_crossed: bool,
    },

    /// The snapshot was dropped because its session ended.
    Cleared,
}

/// Events related to the wallet session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { address: Address },
    Disconnected {
        address: Address,
        reason: DisconnectReason,
    },
}

/// Why a session was torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    UserRequested,
    /// The wallet now reports a different active account.
    AddressChanged { current: Address },
    /// The wallet stopped exposing an account (locked, removed, no accounts).
    AccountUnavailable(String),
    /// The wallet pushed a key store change notification.
    KeystoreChanged,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectReason::UserRequested => f.write_str("disconnected"),
            DisconnectReason::AddressChanged { current } => {
                write!(f, "wallet account changed to {}", current.short())
            }
            DisconnectReason::AccountUnavailable(reason) => {
                write!(f, "wallet account unavailable: {reason}")
            }
            DisconnectReason::KeystoreChanged => f.write_str("wallet key store changed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// One line for the user-visible status channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub const REFRESHED: &'static str = "Game state refreshed";

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }

    /// The line published after every successful poll.
    pub fn is_refresh_notice(&self) -> bool {
        self.level == StatusLevel::Info && self.text == Self::REFRESHED
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

//! Last successfully reconciled view of the contract.

use std::sync::Arc;

use game_core::{BlockHeight, GameState, Guess, NumberBoard, RoundPhase};
use tokio::sync::watch;
use tokio::time::Instant;

/// Game state, current-round guesses and block height from one refresh.
///
/// Always replaced as a whole; readers never observe a mix of two refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub game_state: GameState,
    pub guesses: Vec<Guess>,
    pub block_height: BlockHeight,
    pub refreshed_at: Instant,
}

impl GameSnapshot {
    pub fn phase(&self) -> RoundPhase {
        self.game_state.phase(self.block_height)
    }

    pub fn board(&self) -> NumberBoard {
        NumberBoard::new(Some(&self.game_state), &self.guesses)
    }
}

/// Watchable holder of the current snapshot.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<watch::Sender<Option<Arc<GameSnapshot>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(watch::channel(None).0),
        }
    }

    pub fn current(&self) -> Option<Arc<GameSnapshot>> {
        self.current.borrow().clone()
    }

    /// Replace the snapshot, returning the previous one.
    pub fn publish(&self, snapshot: GameSnapshot) -> Option<Arc<GameSnapshot>> {
        self.current.send_replace(Some(Arc::new(snapshot)))
    }

    pub fn clear(&self) -> Option<Arc<GameSnapshot>> {
        self.current.send_replace(None)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<GameSnapshot>>> {
        self.current.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

//! View-model snapshots derived from a [`runtime::GameSnapshot`].
use client_blockchain_core::Currency;
use game_core::{
    Address, Amount, BlockHeight, LeaderboardEntry, RoundId, RoundPhase, format_amount,
};
use runtime::GameSnapshot;

use crate::message::{MessageEntry, MessageLog};

/// Everything a status screen shows, precomputed for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameView {
    /// Shortened connected address, if a session is open.
    pub address: Option<String>,
    pub round_id: RoundId,
    pub phase: RoundPhase,
    pub block_height: BlockHeight,
    pub remaining_blocks: u64,
    pub guess_count: u32,
    pub max_guesses: u32,
    /// Pool in display units, e.g. `5.00 SHR`.
    pub pool: String,
    pub is_admin: bool,
    pub available_numbers: Vec<u32>,
    pub taken_numbers: Vec<u32>,
}

impl GameView {
    pub fn from_snapshot(
        snapshot: &GameSnapshot,
        address: Option<&Address>,
        currency: &Currency,
    ) -> Self {
        let state = &snapshot.game_state;
        let board = snapshot.board();

        Self {
            address: address.map(Address::short),
            round_id: state.round_id,
            phase: snapshot.phase(),
            block_height: snapshot.block_height,
            remaining_blocks: state.remaining_blocks(snapshot.block_height),
            guess_count: state.guess_count,
            max_guesses: state.max_guesses,
            pool: display_amount(state.pool, currency),
            is_admin: address.is_some_and(|a| state.is_admin(a)),
            available_numbers: board.available().collect(),
            taken_numbers: board.taken().collect(),
        }
    }

    pub fn phase_label(&self) -> String {
        match self.phase {
            RoundPhase::Inactive => "inactive (pool empty)".to_string(),
            RoundPhase::Open { remaining } => format!("open, {remaining} blocks left"),
            RoundPhase::Ended => "ended".to_string(),
        }
    }
}

/// One rendered leaderboard line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub address: String,
    pub guesses: u32,
    pub wins: u32,
}

pub fn leaderboard_rows(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| LeaderboardRow {
            rank: index + 1,
            address: entry.address.short(),
            guesses: entry.guesses,
            wins: entry.wins,
        })
        .collect()
}

pub fn display_amount(amount: Amount, currency: &Currency) -> String {
    format!(
        "{} {}",
        format_amount(amount, currency.coin_decimals),
        currency.coin_denom
    )
}

pub fn collect_messages(messages: &MessageLog, limit: usize) -> Vec<MessageEntry> {
    let mut entries: Vec<_> = messages.recent(limit).cloned().collect();
    entries.reverse();
    entries
}

#[cfg(test)]
mod tests {
    use game_core::{GameState, Guess};
    use tokio::time::Instant;

    use super::*;

    fn shr() -> Currency {
        Currency {
            coin_denom: "SHR".to_string(),
            coin_minimal_denom: "nshr".to_string(),
            coin_decimals: 9,
        }
    }

    fn snapshot(height: BlockHeight) -> GameSnapshot {
        GameSnapshot {
            game_state: GameState {
                admin: Address::new("shareledger1adminxxxxxxxxxxxxxxxxx"),
                pool: Amount::new(5_005_000_000),
                target_number: 0,
                round_id: RoundId(4),
                round_end: 1000,
                round_duration: 600,
                guess_count: 2,
                max_guesses: 5,
            },
            guesses: vec![
                Guess::new("shareledger1a", 2, RoundId(4)),
                Guess::new("shareledger1b", 5, RoundId(4)),
            ],
            block_height: height,
            refreshed_at: Instant::now(),
        }
    }

    #[test]
    fn view_reflects_round_board_and_pool() {
        let admin = Address::new("shareledger1adminxxxxxxxxxxxxxxxxx");
        let view = GameView::from_snapshot(&snapshot(990), Some(&admin), &shr());

        assert_eq!(view.address.as_deref(), Some("shareledge...xxxx"));
        assert_eq!(view.round_id, RoundId(4));
        assert_eq!(view.phase, RoundPhase::Open { remaining: 10 });
        assert_eq!(view.remaining_blocks, 10);
        assert_eq!(view.pool, "5.01 SHR");
        assert!(view.is_admin);
        assert_eq!(view.available_numbers, vec![1, 3, 4]);
        assert_eq!(view.taken_numbers, vec![2, 5]);
    }

    #[test]
    fn ended_round_without_session() {
        let view = GameView::from_snapshot(&snapshot(1200), None, &shr());
        assert_eq!(view.phase, RoundPhase::Ended);
        assert_eq!(view.remaining_blocks, 0);
        assert_eq!(view.phase_label(), "ended");
        assert!(view.address.is_none());
        assert!(!view.is_admin);
    }

    #[test]
    fn leaderboard_rows_are_ranked_from_one() {
        let rows = leaderboard_rows(&[LeaderboardEntry {
            address: Address::new("A"),
            guesses: 3,
            wins: 1,
        }]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].address, "A");
    }
}

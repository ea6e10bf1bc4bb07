//! Number board for the current round.
use std::collections::BTreeSet;

use crate::state::{GameState, Guess};

/// Numbers a player can pick this round, with the ones already taken.
///
/// The board spans `1..=min(max_guesses, MAX_SIZE)`; before any state is
/// known it falls back to `DEFAULT_SIZE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberBoard {
    size: u32,
    taken: BTreeSet<u32>,
}

impl NumberBoard {
    pub const MAX_SIZE: u32 = 200;
    pub const DEFAULT_SIZE: u32 = 200;

    /// Build the board from the current-round guess listing.
    ///
    /// Guesses tagged with a different round than `state` are ignored.
    pub fn new(state: Option<&GameState>, guesses: &[Guess]) -> Self {
        let size = state
            .map(|s| s.max_guesses)
            .filter(|max| *max > 0)
            .unwrap_or(Self::DEFAULT_SIZE)
            .min(Self::MAX_SIZE);

        let current_round = state.map(|s| s.round_id);
        let taken = guesses
            .iter()
            .filter(|g| match (g.round_id, current_round) {
                (Some(round), Some(current)) => round == current,
                _ => true,
            })
            .map(|g| g.number)
            .collect();

        Self { size, taken }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_taken(&self, number: u32) -> bool {
        self.taken.contains(&number)
    }

    pub fn taken(&self) -> impl Iterator<Item = u32> + '_ {
        self.taken.iter().copied()
    }

    pub fn available(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.size).filter(|n| !self.taken.contains(n))
    }

    pub fn available_count(&self) -> usize {
        self.available().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, Amount, RoundId};

    fn state(max_guesses: u32) -> GameState {
        GameState {
            admin: Address::new("admin"),
            pool: Amount::new(1),
            target_number: 0,
            round_id: RoundId(2),
            round_end: 10,
            round_duration: 10,
            guess_count: 0,
            max_guesses,
        }
    }

    #[test]
    fn marks_current_round_numbers_taken() {
        let guesses = vec![
            Guess::new("a", 3, RoundId(2)),
            Guess::new("b", 5, RoundId(1)),
            Guess {
                player: Address::new("c"),
                number: 7,
                round_id: None,
            },
        ];
        let board = NumberBoard::new(Some(&state(10)), &guesses);

        assert_eq!(board.size(), 10);
        assert!(board.is_taken(3));
        assert!(board.is_taken(7));
        assert!(!board.is_taken(5));
        assert_eq!(board.available_count(), 8);
        assert_eq!(board.available().next(), Some(1));
    }

    #[test]
    fn caps_and_defaults_board_size() {
        assert_eq!(NumberBoard::new(Some(&state(500)), &[]).size(), 200);
        assert_eq!(NumberBoard::new(None, &[]).size(), 200);
        assert_eq!(NumberBoard::new(Some(&state(100)), &[]).size(), 100);
    }
}

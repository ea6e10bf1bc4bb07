//! Player ranking derived from the full guess history.
//!
//! The leaderboard is never stored; it is recomputed from the contract's
//! all-round guess listing and per-round winner lookups on every refresh.
use std::collections::{BTreeMap, BTreeSet};

use crate::state::{Address, GameState, Guess, RoundId};

/// Number of players shown on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardEntry {
    pub address: Address,
    pub guesses: u32,
    pub wins: u32,
}

/// Rank players by wins, then guesses, then address.
///
/// `winners` is asked once per completed round (`1 .. state.round_id`); a
/// `None` answer means the lookup failed or the round has no winner and the
/// round is skipped. Only addresses that appear in `all_guesses` are ranked,
/// and each address counts at most one win per round.
pub fn compute_leaderboard<F>(
    all_guesses: &[Guess],
    state: &GameState,
    mut winners: F,
) -> Vec<LeaderboardEntry>
where
    F: FnMut(RoundId) -> Option<Vec<Address>>,
{
    let mut guess_counts: BTreeMap<&Address, u32> = BTreeMap::new();
    for guess in all_guesses {
        *guess_counts.entry(&guess.player).or_default() += 1;
    }

    let mut win_counts: BTreeMap<Address, u32> = BTreeMap::new();
    for round in state.completed_rounds() {
        let Some(round_winners) = winners(round) else {
            continue;
        };
        let unique: BTreeSet<Address> = round_winners.into_iter().collect();
        for address in unique {
            *win_counts.entry(address).or_default() += 1;
        }
    }

    let mut entries: Vec<LeaderboardEntry> = guess_counts
        .into_iter()
        .map(|(address, guesses)| LeaderboardEntry {
            address: address.clone(),
            guesses,
            wins: win_counts.get(address).copied().unwrap_or(0),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.guesses.cmp(&a.guesses))
            .then_with(|| a.address.cmp(&b.address))
    });
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;

    fn state(round_id: u64) -> GameState {
        GameState {
            admin: Address::new("admin"),
            pool: Amount::new(1),
            target_number: 0,
            round_id: RoundId(round_id),
            round_end: 0,
            round_duration: 0,
            guess_count: 0,
            max_guesses: 100,
        }
    }

    fn entry(address: &str, guesses: u32, wins: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            address: Address::new(address),
            guesses,
            wins,
        }
    }

    #[test]
    fn skips_rounds_whose_lookup_fails() {
        let guesses = vec![
            Guess::new("A", 1, RoundId(1)),
            Guess::new("B", 2, RoundId(1)),
            Guess::new("A", 3, RoundId(2)),
        ];

        let board = compute_leaderboard(&guesses, &state(3), |round| match round.0 {
            1 => Some(vec![Address::new("A")]),
            _ => None,
        });

        assert_eq!(board, vec![entry("A", 2, 1), entry("B", 1, 0)]);
    }

    #[test]
    fn only_completed_rounds_are_looked_up() {
        let mut asked = Vec::new();
        compute_leaderboard(&[], &state(4), |round| {
            asked.push(round);
            None
        });
        assert_eq!(asked, vec![RoundId(1), RoundId(2), RoundId(3)]);
    }

    #[test]
    fn sorts_by_wins_then_guesses_then_address() {
        let mut guesses = Vec::new();
        for (player, count) in [("C", 5), ("A", 2), ("B", 2), ("D", 9)] {
            for n in 0..count {
                guesses.push(Guess::new(player, n + 1, RoundId(1)));
            }
        }

        let board = compute_leaderboard(&guesses, &state(3), |round| match round.0 {
            1 => Some(vec![Address::new("A"), Address::new("B"), Address::new("A")]),
            2 => Some(vec![Address::new("A")]),
            _ => None,
        });

        assert_eq!(
            board,
            vec![
                entry("A", 2, 2),
                entry("B", 2, 1),
                entry("D", 9, 0),
                entry("C", 5, 0),
            ]
        );
    }

    #[test]
    fn winners_without_guesses_are_not_ranked() {
        let guesses = vec![Guess::new("A", 1, RoundId(1))];
        let board = compute_leaderboard(&guesses, &state(2), |_| Some(vec![Address::new("Z")]));
        assert_eq!(board, vec![entry("A", 1, 0)]);
    }

    #[test]
    fn truncates_to_top_ten_and_is_deterministic() {
        let guesses: Vec<Guess> = (0..25)
            .map(|i| Guess::new(format!("player{i:02}").as_str(), 1, RoundId(1)))
            .collect();
        let lookup = |round: RoundId| Some(vec![Address::new(format!("player{:02}", round.0))]);

        let first = compute_leaderboard(&guesses, &state(6), lookup);
        let second = compute_leaderboard(&guesses, &state(6), lookup);

        assert_eq!(first.len(), LEADERBOARD_SIZE);
        assert_eq!(first, second);
        for pair in first.windows(2) {
            assert!((pair[0].wins, pair[0].guesses) >= (pair[1].wins, pair[1].guesses));
        }
        assert_eq!(first[0], entry("player01", 1, 1));
    }
}

//! Contract state snapshots as seen by a client.
//!
//! These are read-only mirrors of what the contract last reported. A client
//! never advances `round_id`, `pool` or `guess_count` on its own; it replaces
//! the whole snapshot on the next successful query.
use core::fmt;

use crate::amount::Amount;

/// Block height reported by the chain.
pub type BlockHeight = u64;

/// Bech32 account or contract address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display: first 10 and last 4 characters.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 14 {
            return self.0.clone();
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Round identifier. Rounds are numbered from 1 and only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct RoundId(pub u64);

impl RoundId {
    pub const FIRST: Self = Self(1);

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the contract's `get_game_state` response.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub admin: Address,
    pub pool: Amount,
    pub target_number: u32,
    pub round_id: RoundId,
    /// Block height at which the current round closes.
    pub round_end: BlockHeight,
    pub round_duration: u64,
    pub guess_count: u32,
    pub max_guesses: u32,
}

/// Where the current round stands at a given block height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// Pool is empty; the admin has not funded the round.
    Inactive,
    /// Accepting guesses for `remaining` more blocks.
    Open { remaining: u64 },
    /// Funded, but the chain has reached `round_end`.
    Ended,
}

impl GameState {
    /// A round is active while its pool holds funds.
    pub fn is_active(&self) -> bool {
        !self.pool.is_zero()
    }

    pub fn is_ended(&self, height: BlockHeight) -> bool {
        height >= self.round_end
    }

    /// Blocks left before `round_end`, clamped at zero.
    pub fn remaining_blocks(&self, height: BlockHeight) -> u64 {
        self.round_end.saturating_sub(height)
    }

    pub fn phase(&self, height: BlockHeight) -> RoundPhase {
        if !self.is_active() {
            RoundPhase::Inactive
        } else if self.is_ended(height) {
            RoundPhase::Ended
        } else {
            RoundPhase::Open {
                remaining: self.remaining_blocks(height),
            }
        }
    }

    pub fn is_admin(&self, address: &Address) -> bool {
        &self.admin == address
    }

    /// Rounds strictly before the current one, oldest first.
    pub fn completed_rounds(&self) -> impl Iterator<Item = RoundId> + use<> {
        (RoundId::FIRST.0..self.round_id.0).map(RoundId)
    }
}

/// A single guess recorded by the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Guess {
    pub player: Address,
    pub number: u32,
    /// Absent in the current-round listing of some contract versions.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub round_id: Option<RoundId>,
}

impl Guess {
    pub fn new(player: impl Into<Address>, number: u32, round_id: RoundId) -> Self {
        Self {
            player: player.into(),
            number,
            round_id: Some(round_id),
        }
    }
}

/// True when the chain moved from below `round_end` to at or past it between
/// two observations.
pub fn crossed_round_end(
    previous: Option<BlockHeight>,
    current: BlockHeight,
    round_end: BlockHeight,
) -> bool {
    matches!(previous, Some(prev) if prev < round_end) && current >= round_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pool: u128, round_end: u64) -> GameState {
        GameState {
            admin: Address::new("shareledger1admin"),
            pool: Amount::new(pool),
            target_number: 0,
            round_id: RoundId(3),
            round_end,
            round_duration: 100,
            guess_count: 0,
            max_guesses: 100,
        }
    }

    #[test]
    fn round_reports_remaining_until_end() {
        let state = state(5_000_000_000, 1000);

        assert!(state.is_active());
        assert!(!state.is_ended(999));
        assert_eq!(state.remaining_blocks(999), 1);
        assert_eq!(state.phase(999), RoundPhase::Open { remaining: 1 });

        assert!(state.is_ended(1000));
        assert_eq!(state.phase(1000), RoundPhase::Ended);
        assert_eq!(state.remaining_blocks(1500), 0);
    }

    #[test]
    fn empty_pool_is_inactive_regardless_of_height() {
        let state = state(0, 1000);
        assert_eq!(state.phase(10), RoundPhase::Inactive);
        assert_eq!(state.phase(2000), RoundPhase::Inactive);
    }

    #[test]
    fn remaining_is_never_negative_while_active() {
        let state = state(1, 50);
        for height in 0..200 {
            if let RoundPhase::Open { remaining } = state.phase(height) {
                assert!(remaining >= 1);
                assert_eq!(remaining, 50 - height);
            }
        }
    }

    #[test]
    fn completed_rounds_exclude_current() {
        let rounds: Vec<_> = state(1, 1).completed_rounds().collect();
        assert_eq!(rounds, vec![RoundId(1), RoundId(2)]);

        let mut first = state(1, 1);
        first.round_id = RoundId::FIRST;
        assert_eq!(first.completed_rounds().count(), 0);
    }

    #[test]
    fn detects_round_end_crossing() {
        assert!(crossed_round_end(Some(999), 1000, 1000));
        assert!(crossed_round_end(Some(990), 1005, 1000));
        assert!(!crossed_round_end(Some(1000), 1001, 1000));
        assert!(!crossed_round_end(Some(998), 999, 1000));
        assert!(!crossed_round_end(None, 1000, 1000));
    }

    #[test]
    fn shortens_long_addresses() {
        let address = Address::new("shareledger1hyja4uyjktpeh0fxzuw2fmjudr85rk2q");
        assert_eq!(address.short(), "shareledge...rk2q");
        assert_eq!(Address::new("short").short(), "short");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decodes_contract_game_state() {
        let json = r#"{
            "admin": "shareledger1admin",
            "pool": "5000000000",
            "target_number": 42,
            "round_id": 3,
            "round_end": 1000,
            "round_duration": 600,
            "guess_count": 7,
            "max_guesses": 100
        }"#;
        let decoded: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.pool, Amount::new(5_000_000_000));
        assert_eq!(decoded.round_id, RoundId(3));

        let guess: Guess = serde_json::from_str(r#"{"player":"a","number":4}"#).unwrap();
        assert_eq!(guess.round_id, None);
    }
}

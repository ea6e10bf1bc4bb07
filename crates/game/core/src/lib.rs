//! Deterministic rules and data types of the on-chain guessing game.
//!
//! `game-core` mirrors the contract's state shapes and owns every rule a client
//! applies before talking to the chain: round phase, guess validation, the
//! number board and leaderboard aggregation. Nothing here performs I/O, so the
//! runtime, frontends and tests all share the same logic.
pub mod amount;
pub mod board;
pub mod leaderboard;
pub mod msg;
pub mod state;
pub mod validation;

pub use amount::{Amount, ParseAmountError, format_amount};
pub use board::NumberBoard;
pub use leaderboard::{LEADERBOARD_SIZE, LeaderboardEntry, compute_leaderboard};
pub use msg::{ExecuteMsg, GameAction, QueryMsg};
pub use state::{Address, BlockHeight, GameState, Guess, RoundId, RoundPhase, crossed_round_end};
pub use validation::{
    ValidationError, ensure_admin, ensure_number_available, ensure_round_open,
    ensure_sufficient_balance, parse_guess_number, parse_pool_amount, parse_round_id,
};

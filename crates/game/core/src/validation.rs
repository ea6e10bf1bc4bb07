//! Client-side checks applied before any transaction is built.
//!
//! Every check here is pure. Callers run them in order and abort on the first
//! failure, so a rejected request never reaches the contract's execute path.
use core::num::IntErrorKind;

use crate::amount::Amount;
use crate::board::NumberBoard;
use crate::state::{Address, BlockHeight, GameState, RoundId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("wallet not connected")]
    NotConnected,

    #[error("game state has not been loaded yet")]
    StateUnavailable,

    #[error("guess must be a whole number, got {input:?}")]
    NotAnInteger { input: String },

    #[error("guess {number} is outside the allowed range 1-{max}")]
    OutOfRange { number: i64, max: u32 },

    #[error("number {0} has already been guessed this round")]
    NumberTaken(u32),

    #[error("round is not active, the admin must add funds to start the round")]
    RoundInactive,

    #[error("round {round_id} ended at block {round_end}")]
    RoundEnded { round_id: RoundId, round_end: BlockHeight },

    #[error("insufficient balance: {available} {denom} available, {required} {denom} required")]
    InsufficientBalance {
        available: Amount,
        required: Amount,
        denom: String,
    },

    #[error("enter a valid round id, got {input:?}")]
    InvalidRoundId { input: String },

    #[error("enter a valid amount, got {input:?}")]
    InvalidAmount { input: String },

    #[error("only the admin can perform this action ({address} is not the admin)")]
    NotAdmin { address: Address },
}

/// Parse user input as a guess and check it against `1..=max`.
pub fn parse_guess_number(input: &str, max: u32) -> Result<u32, ValidationError> {
    // Digit strings too long for i64 are still integers, just out of range.
    let number: i64 = match input.trim().parse::<i64>() {
        Ok(number) => number,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                return Err(ValidationError::NotAnInteger {
                    input: input.to_string(),
                });
            }
        },
    };

    if number < 1 || number > i64::from(max) {
        return Err(ValidationError::OutOfRange { number, max });
    }

    // In range 1..=u32::MAX, so the conversion cannot fail.
    Ok(number as u32)
}

pub fn ensure_number_available(number: u32, board: &NumberBoard) -> Result<(), ValidationError> {
    if board.is_taken(number) {
        return Err(ValidationError::NumberTaken(number));
    }
    Ok(())
}

/// The round must be funded and the chain must still be below `round_end`.
pub fn ensure_round_open(state: &GameState, height: BlockHeight) -> Result<(), ValidationError> {
    if !state.is_active() {
        return Err(ValidationError::RoundInactive);
    }
    if state.is_ended(height) {
        return Err(ValidationError::RoundEnded {
            round_id: state.round_id,
            round_end: state.round_end,
        });
    }
    Ok(())
}

pub fn ensure_sufficient_balance(
    available: Amount,
    required: Amount,
    denom: &str,
) -> Result<(), ValidationError> {
    if available < required {
        return Err(ValidationError::InsufficientBalance {
            available,
            required,
            denom: denom.to_string(),
        });
    }
    Ok(())
}

pub fn parse_round_id(input: &str) -> Result<RoundId, ValidationError> {
    match input.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(RoundId(id)),
        _ => Err(ValidationError::InvalidRoundId {
            input: input.to_string(),
        }),
    }
}

pub fn parse_pool_amount(input: &str) -> Result<Amount, ValidationError> {
    match input.parse::<Amount>() {
        Ok(amount) if !amount.is_zero() => Ok(amount),
        _ => Err(ValidationError::InvalidAmount {
            input: input.to_string(),
        }),
    }
}

pub fn ensure_admin(state: &GameState, address: &Address) -> Result<(), ValidationError> {
    if !state.is_admin(address) {
        return Err(ValidationError::NotAdmin {
            address: address.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState {
            admin: Address::new("admin"),
            pool: Amount::new(5_000_000_000),
            target_number: 0,
            round_id: RoundId(3),
            round_end: 1000,
            round_duration: 100,
            guess_count: 0,
            max_guesses: 100,
        }
    }

    #[test]
    fn rejects_out_of_range_guesses() {
        assert_eq!(
            parse_guess_number("0", 100),
            Err(ValidationError::OutOfRange { number: 0, max: 100 })
        );
        assert_eq!(
            parse_guess_number("101", 100),
            Err(ValidationError::OutOfRange { number: 101, max: 100 })
        );
        assert!(matches!(
            parse_guess_number("-4", 100),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(parse_guess_number("1", 100), Ok(1));
        assert_eq!(parse_guess_number(" 100 ", 100), Ok(100));
    }

    #[test]
    fn oversized_integers_are_out_of_range() {
        assert!(matches!(
            parse_guess_number("99999999999999999999", 100),
            Err(ValidationError::OutOfRange { number: i64::MAX, max: 100 })
        ));
        assert!(matches!(
            parse_guess_number("-99999999999999999999", 100),
            Err(ValidationError::OutOfRange { number: i64::MIN, max: 100 })
        ));
    }

    #[test]
    fn rejects_non_integer_guesses() {
        for input in ["3.5", "abc", "", "1e2", "7x"] {
            assert!(
                matches!(
                    parse_guess_number(input, 100),
                    Err(ValidationError::NotAnInteger { .. })
                ),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn round_must_be_funded_and_open() {
        let mut state = state();
        assert_eq!(ensure_round_open(&state, 999), Ok(()));
        assert_eq!(
            ensure_round_open(&state, 1000),
            Err(ValidationError::RoundEnded {
                round_id: RoundId(3),
                round_end: 1000
            })
        );

        state.pool = Amount::ZERO;
        assert_eq!(ensure_round_open(&state, 10), Err(ValidationError::RoundInactive));
    }

    #[test]
    fn balance_must_cover_fee() {
        let fee = Amount::new(15_000_000_000);
        assert!(ensure_sufficient_balance(Amount::new(15_000_000_000), fee, "nshr").is_ok());
        let err = ensure_sufficient_balance(Amount::new(14_999_999_999), fee, "nshr").unwrap_err();
        assert_eq!(
            err.to_string(),
            "insufficient balance: 14999999999 nshr available, 15000000000 nshr required"
        );
    }

    #[test]
    fn round_ids_and_amounts_must_be_positive() {
        assert_eq!(parse_round_id("2"), Ok(RoundId(2)));
        assert!(parse_round_id("0").is_err());
        assert!(parse_round_id("x").is_err());

        assert_eq!(parse_pool_amount("500"), Ok(Amount::new(500)));
        assert!(parse_pool_amount("0").is_err());
        assert!(parse_pool_amount("-5").is_err());
    }

    #[test]
    fn only_admin_passes_admin_check() {
        let state = state();
        assert!(ensure_admin(&state, &Address::new("admin")).is_ok());
        assert_eq!(
            ensure_admin(&state, &Address::new("player")),
            Err(ValidationError::NotAdmin {
                address: Address::new("player")
            })
        );
    }
}

//! Contract message shapes and the player/admin actions that produce them.
use crate::amount::Amount;
use crate::state::RoundId;

/// Smart-query messages understood by the guessing contract.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum QueryMsg {
    GetGameState {},
    /// Guesses of the current round.
    GetGuesses {},
    /// Guesses across every round.
    GetAllGuesses {},
    GetWinner { round_id: RoundId },
}

/// Execute messages understood by the guessing contract.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ExecuteMsg {
    Guess { number: u32 },
    ClaimPrize { round_id: RoundId },
    AddFundsToPool {},
    CollectUnclaimedPool { round_id: RoundId },
}

/// A state-changing request from the player or the admin.
///
/// Unlike [`ExecuteMsg`], `AddFundsToPool` carries the amount, since it is sent
/// as attached funds rather than in the message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameAction {
    Guess { number: u32 },
    ClaimPrize { round_id: RoundId },
    AddFundsToPool { amount: Amount },
    CollectUnclaimedPool { round_id: RoundId },
}

impl GameAction {
    pub fn to_msg(&self) -> ExecuteMsg {
        match *self {
            Self::Guess { number } => ExecuteMsg::Guess { number },
            Self::ClaimPrize { round_id } => ExecuteMsg::ClaimPrize { round_id },
            Self::AddFundsToPool { .. } => ExecuteMsg::AddFundsToPool {},
            Self::CollectUnclaimedPool { round_id } => ExecuteMsg::CollectUnclaimedPool { round_id },
        }
    }

    /// Transaction memo attached to the broadcast.
    pub fn memo(&self) -> &'static str {
        match self {
            Self::Guess { .. } => "Submit guess",
            Self::ClaimPrize { .. } => "Claim prize",
            Self::AddFundsToPool { .. } => "add funds",
            Self::CollectUnclaimedPool { .. } => "collect funds",
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Self::AddFundsToPool { .. } | Self::CollectUnclaimedPool { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Guess { .. } => "guess",
            Self::ClaimPrize { .. } => "claim_prize",
            Self::AddFundsToPool { .. } => "add_funds_to_pool",
            Self::CollectUnclaimedPool { .. } => "collect_unclaimed_pool",
        }
    }
}

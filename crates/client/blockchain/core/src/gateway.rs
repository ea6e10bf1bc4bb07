//! `GameGateway` over any `ChainReader`.
//!
//! Contract answers go through a validated decode step: a response that does
//! not match the expected shape is reported as `MalformedResponse` instead of
//! being treated as an empty result.

use async_trait::async_trait;
use game_core::{Address, Amount, BlockHeight, GameAction, GameState, Guess, QueryMsg, RoundId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::traits::{ChainReader, GameGateway, GatewayError, TransactionSigner};
use crate::types::{ExecuteRequest, FeeSchedule, TxHash};

/// Guessing contract at a fixed address, reached through `reader`.
pub struct ContractGateway<R> {
    reader: R,
    contract: Address,
    fees: FeeSchedule,
}

impl<R: ChainReader> ContractGateway<R> {
    pub fn new(reader: R, contract: Address, fees: FeeSchedule) -> Self {
        Self {
            reader,
            contract,
            fees,
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    async fn query<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        msg: QueryMsg,
    ) -> Result<T, GatewayError> {
        let query = serde_json::to_value(&msg).map_err(|e| GatewayError::MalformedResponse {
            operation,
            reason: format!("failed to encode query: {e}"),
        })?;
        let raw = self.reader.query_smart(&self.contract, &query).await?;
        debug!(operation, "contract query answered");
        decode(operation, raw)
    }
}

/// Decode a contract answer, naming the operation on failure.
pub fn decode<T: DeserializeOwned>(
    operation: &'static str,
    raw: serde_json::Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(raw).map_err(|e| GatewayError::MalformedResponse {
        operation,
        reason: e.to_string(),
    })
}

/// Guess listings arrive either bare or wrapped in `{"guesses": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum GuessesResponse {
    List(Vec<Guess>),
    Wrapped { guesses: Vec<Guess> },
}

impl From<GuessesResponse> for Vec<Guess> {
    fn from(value: GuessesResponse) -> Self {
        match value {
            GuessesResponse::List(guesses) | GuessesResponse::Wrapped { guesses } => guesses,
        }
    }
}

/// Winner lookups answer with a list, a `{"winners": [...]}` wrapper, a single
/// `{"winner": ...}` or `null` for a round nobody won.
#[derive(Deserialize)]
#[serde(untagged)]
enum WinnerResponse {
    List(Vec<Address>),
    Many { winners: Vec<Address> },
    One(SingleWinner),
    None(()),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SingleWinner {
    winner: Option<Address>,
}

impl From<WinnerResponse> for Vec<Address> {
    fn from(value: WinnerResponse) -> Self {
        match value {
            WinnerResponse::List(winners) | WinnerResponse::Many { winners } => winners,
            WinnerResponse::One(single) => single.winner.into_iter().collect(),
            WinnerResponse::None(()) => Vec::new(),
        }
    }
}

#[async_trait]
impl<R: ChainReader> GameGateway for ContractGateway<R> {
    async fn get_game_state(&self) -> Result<GameState, GatewayError> {
        self.query("get_game_state", QueryMsg::GetGameState {}).await
    }

    async fn get_guesses(&self) -> Result<Vec<Guess>, GatewayError> {
        self.query::<GuessesResponse>("get_guesses", QueryMsg::GetGuesses {})
            .await
            .map(Into::into)
    }

    async fn get_all_guesses(&self) -> Result<Vec<Guess>, GatewayError> {
        self.query::<GuessesResponse>("get_all_guesses", QueryMsg::GetAllGuesses {})
            .await
            .map(Into::into)
    }

    async fn get_winner(&self, round_id: RoundId) -> Result<Vec<Address>, GatewayError> {
        self.query::<WinnerResponse>("get_winner", QueryMsg::GetWinner { round_id })
            .await
            .map(Into::into)
    }

    async fn latest_block_height(&self) -> Result<BlockHeight, GatewayError> {
        Ok(self.reader.latest_block_height().await?)
    }

    async fn balance(&self, address: &Address) -> Result<Amount, GatewayError> {
        Ok(self.reader.balance(address, &self.fees.denom).await?)
    }

    fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    async fn execute(
        &self,
        signer: &dyn TransactionSigner,
        sender: &Address,
        action: GameAction,
    ) -> Result<TxHash, GatewayError> {
        let request = ExecuteRequest::for_action(&self.contract, sender, &self.fees, &action)
            .map_err(|e| {
                GatewayError::ExecutionRejected(format!("failed to encode {}: {e}", action.name()))
            })?;

        let hash = signer.sign_and_broadcast(request).await?;
        info!(action = action.name(), tx = %hash, "transaction broadcast");
        Ok(hash)
    }
}

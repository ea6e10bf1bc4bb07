//! Leaderboard loading.

use std::collections::HashMap;

use client_blockchain_core::{GameGateway, GatewayError};
use game_core::{GameState, LeaderboardEntry, compute_leaderboard};
use tracing::{debug, warn};

/// Fetch the all-round guess history and every completed round's winners,
/// then rank players.
///
/// A failed winner lookup skips that round; a failed guess listing fails the
/// whole load.
pub async fn load_leaderboard(
    gateway: &dyn GameGateway,
    state: &GameState,
) -> Result<Vec<LeaderboardEntry>, GatewayError> {
    let all_guesses = gateway.get_all_guesses().await?;

    let mut winners = HashMap::new();
    for round in state.completed_rounds() {
        match gateway.get_winner(round).await {
            Ok(addresses) => {
                winners.insert(round, addresses);
            }
            Err(e) => warn!("Skipping winners of round {}: {}", round, e),
        }
    }

    let entries = compute_leaderboard(&all_guesses, state, |round| winners.remove(&round));
    debug!(
        players = entries.len(),
        guesses = all_guesses.len(),
        "Leaderboard computed"
    );
    Ok(entries)
}

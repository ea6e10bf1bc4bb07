//! State reconciler.
//!
//! Pulls game state, current-round guesses and block height from the gateway
//! and replaces the snapshot in one step. Results are applied only while the
//! session that requested them is still current.

use std::sync::Arc;
use std::time::Duration;

use client_blockchain_core::{GameGateway, GatewayError};
use game_core::crossed_round_end;
use tokio::sync::{oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::events::{Event, EventBus, SnapshotEvent, StatusMessage};
use crate::session::{Session, SessionState, SessionToken};
use crate::snapshot::{GameSnapshot, SnapshotStore};

/// What happened to one refresh.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The snapshot was replaced.
    Applied { round_end_crossed: bool },
    /// The session ended while the queries were in flight.
    Discarded,
    /// A query failed; the previous snapshot is kept.
    Failed(GatewayError),
}

/// Applies gateway reads to the snapshot store on behalf of a session.
#[derive(Clone)]
pub struct Reconciler {
    gateway: Arc<dyn GameGateway>,
    sessions: SessionState,
    snapshots: SnapshotStore,
    events: EventBus,
}

impl Reconciler {
    pub fn new(
        gateway: Arc<dyn GameGateway>,
        sessions: SessionState,
        snapshots: SnapshotStore,
        events: EventBus,
    ) -> Self {
        Self {
            gateway,
            sessions,
            snapshots,
            events,
        }
    }

    /// Run one refresh for `token`.
    pub async fn refresh(&self, token: SessionToken) -> RefreshOutcome {
        let result = tokio::try_join!(
            self.gateway.get_game_state(),
            self.gateway.get_guesses(),
            self.gateway.latest_block_height(),
        );

        let (game_state, guesses, block_height) = match result {
            Ok(reads) => reads,
            Err(e) => {
                if !self.sessions.is_current(token) {
                    debug!("Dropping refresh error for ended session: {}", e);
                    return RefreshOutcome::Discarded;
                }
                warn!("Refresh failed: {}", e);
                self.events.error(format!("Error refreshing game state: {e}"));
                return RefreshOutcome::Failed(e);
            }
        };

        let applied = self.sessions.apply_if_current(token, || {
            let previous = self.snapshots.current().map(|s| s.block_height);
            let round_end_crossed =
                crossed_round_end(previous, block_height, game_state.round_end);
            let round_id = game_state.round_id;

            self.snapshots.publish(GameSnapshot {
                game_state,
                guesses,
                block_height,
                refreshed_at: Instant::now(),
            });
            self.events.publish(Event::Snapshot(SnapshotEvent::Refreshed {
                round_id,
                block_height,
                round_end_crossed,
            }));
            self.events.info(StatusMessage::REFRESHED);
            round_end_crossed
        });

        match applied {
            Some(round_end_crossed) => {
                debug!(block_height, round_end_crossed, "Snapshot replaced");
                RefreshOutcome::Applied { round_end_crossed }
            }
            None => {
                debug!("Discarding refresh for ended session");
                RefreshOutcome::Discarded
            }
        }
    }

    /// Refresh, and refresh once more right away if the round just ended.
    pub async fn reconcile(&self, token: SessionToken) -> RefreshOutcome {
        let outcome = self.refresh(token).await;
        if let RefreshOutcome::Applied {
            round_end_crossed: true,
        } = outcome
        {
            info!("Round end reached, refreshing again");
            return self.refresh(token).await;
        }
        outcome
    }

    pub(crate) fn sessions(&self) -> &SessionState {
        &self.sessions
    }
}

/// Periodic refresh loop bound to one session.
pub struct ReconcilerWorker {
    reconciler: Reconciler,
    token: SessionToken,
    period: Duration,
    session_rx: watch::Receiver<Option<Arc<Session>>>,
}

impl ReconcilerWorker {
    pub fn new(reconciler: Reconciler, token: SessionToken, period: Duration) -> Self {
        let session_rx = reconciler.sessions().subscribe();
        Self {
            reconciler,
            token,
            period,
            session_rx,
        }
    }

    /// Main worker loop.
    ///
    /// The first tick fires one period after start; the caller is expected
    /// to have refreshed once already.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(period = ?self.period, "ReconcilerWorker started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Shutdown signal received");
                    break;
                }
                changed = self.session_rx.changed() => {
                    if changed.is_err() || !self.reconciler.sessions().is_current(self.token) {
                        debug!("Session ended, stopping refresh loop");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    // A stalled read must not hold up shutdown.
                    let outcome = tokio::select! {
                        _ = &mut shutdown => {
                            debug!("Shutdown signal received mid-refresh");
                            break;
                        }
                        outcome = self.reconciler.reconcile(self.token) => outcome,
                    };
                    if let RefreshOutcome::Discarded = outcome {
                        break;
                    }
                }
            }
        }

        debug!("ReconcilerWorker stopped");
    }
}

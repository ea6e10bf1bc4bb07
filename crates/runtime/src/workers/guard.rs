//! Session guard.
//!
//! Watches the wallet for two independent signals: a periodic re-read of
//! the enabled account and key store change notifications. Either one reporting
//! a different (or missing) account ends the session. Reconnecting is always
//! left to the user.

use std::sync::Arc;
use std::time::Duration;

use client_blockchain_core::{KeystoreEvent, WalletError, WalletProvider};
use game_core::Address;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::events::{DisconnectReason, Event, EventBus, SessionEvent, SnapshotEvent};
use crate::session::{Session, SessionState, SessionToken};
use crate::snapshot::SnapshotStore;

/// Ends a session and drops everything derived from it.
#[derive(Clone)]
pub struct Teardown {
    sessions: SessionState,
    snapshots: SnapshotStore,
    events: EventBus,
}

impl Teardown {
    pub fn new(sessions: SessionState, snapshots: SnapshotStore, events: EventBus) -> Self {
        Self {
            sessions,
            snapshots,
            events,
        }
    }

    /// End the session identified by `token` (any session for `None`).
    ///
    /// Returns false when there was nothing to end.
    pub fn end(&self, token: Option<SessionToken>, reason: DisconnectReason) -> bool {
        let ended = self
            .sessions
            .end_with(token, |_| {
                self.snapshots.clear();
            });
        let Some(session) = ended else {
            return false;
        };

        info!(address = %session.address, %reason, "Session ended");
        self.events.publish(Event::Snapshot(SnapshotEvent::Cleared));
        self.events.publish(Event::Session(SessionEvent::Disconnected {
            address: session.address.clone(),
            reason: reason.clone(),
        }));
        match reason {
            DisconnectReason::UserRequested => self.events.info("Wallet disconnected"),
            reason => self.events.error(format!("Disconnected: {reason}")),
        }
        true
    }

    pub(crate) fn sessions(&self) -> &SessionState {
        &self.sessions
    }
}

/// Periodic account check and key store listener bound to one session.
///
/// Subscriptions are taken when the guard is created, so notifications sent
/// before the task first runs are not lost.
pub struct SessionGuard {
    wallet: Arc<dyn WalletProvider>,
    chain_id: String,
    token: SessionToken,
    address: Address,
    period: Duration,
    teardown: Teardown,
    keystore: broadcast::Receiver<KeystoreEvent>,
    session_rx: watch::Receiver<Option<Arc<Session>>>,
}

impl SessionGuard {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        chain_id: impl Into<String>,
        token: SessionToken,
        address: Address,
        period: Duration,
        teardown: Teardown,
    ) -> Self {
        let keystore = wallet.keystore_changes();
        let session_rx = teardown.sessions().subscribe();
        Self {
            wallet,
            chain_id: chain_id.into(),
            token,
            address,
            period,
            teardown,
            keystore,
            session_rx,
        }
    }

    /// Main worker loop.
    ///
    /// The key store subscription lives exactly as long as this loop.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(address = %self.address, period = ?self.period, "SessionGuard started");

        loop {
            let reason = tokio::select! {
                _ = &mut shutdown => {
                    debug!("Shutdown signal received");
                    break;
                }
                changed = self.session_rx.changed() => {
                    if changed.is_err() || !self.teardown.sessions().is_current(self.token) {
                        debug!("Session ended elsewhere, stopping guard");
                        break;
                    }
                    continue;
                }
                event = self.keystore.recv() => match event {
                    Ok(_) => DisconnectReason::KeystoreChanged,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Missed {} key store notifications", skipped);
                        DisconnectReason::KeystoreChanged
                    }
                    Err(broadcast::error::RecvError::Closed) => DisconnectReason::AccountUnavailable(
                        "wallet stopped sending key store notifications".to_string(),
                    ),
                },
                _ = ticker.tick() => {
                    let check = tokio::select! {
                        _ = &mut shutdown => {
                            debug!("Shutdown signal received mid-check");
                            break;
                        }
                        check = self.check_account() => check,
                    };
                    match check {
                        Some(reason) => reason,
                        None => continue,
                    }
                }
            };

            self.teardown.end(Some(self.token), reason);
            break;
        }

        debug!("SessionGuard stopped");
    }

    /// Re-read the enabled account. `Some` means the session is no longer valid.
    async fn check_account(&self) -> Option<DisconnectReason> {
        if let Err(e) = self.wallet.enable(&self.chain_id).await {
            return self.classify(e);
        }

        match self.wallet.accounts(&self.chain_id).await {
            Ok(accounts) => match accounts.into_iter().next() {
                None => Some(DisconnectReason::AccountUnavailable(
                    WalletError::NoAccounts.to_string(),
                )),
                Some(account) if account.address != self.address => {
                    Some(DisconnectReason::AddressChanged {
                        current: account.address,
                    })
                }
                Some(_) => None,
            },
            Err(e) => self.classify(e),
        }
    }

    fn classify(&self, error: WalletError) -> Option<DisconnectReason> {
        if error.ends_session() {
            Some(DisconnectReason::AccountUnavailable(error.to_string()))
        } else {
            warn!("Wallet account check failed, keeping session: {}", error);
            None
        }
    }
}

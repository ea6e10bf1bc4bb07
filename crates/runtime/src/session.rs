//! Wallet session lifecycle.
//!
//! At most one session is current. Each session carries a token that is
//! never reused, so an asynchronous result can be checked against the session
//! that started it before being applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use client_blockchain_core::TransactionSigner;
use game_core::Address;
use tokio::sync::watch;

/// Identity of one connect..disconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

/// A connected wallet identity and its signing handle.
pub struct Session {
    pub token: SessionToken,
    pub address: Address,
    pub signer: Arc<dyn TransactionSigner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Shared slot holding the current session.
#[derive(Clone)]
pub struct SessionState {
    current: Arc<watch::Sender<Option<Arc<Session>>>>,
    next_token: Arc<AtomicU64>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current: Arc::new(watch::channel(None).0),
            next_token: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Start a new session, replacing any current one.
    pub fn begin(&self, address: Address, signer: Arc<dyn TransactionSigner>) -> Arc<Session> {
        let token = SessionToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(Session {
            token,
            address,
            signer,
        });
        self.current.send_replace(Some(session.clone()));
        session
    }

    /// End whatever session is current.
    pub fn end(&self) -> Option<Arc<Session>> {
        self.end_with(None, |_| {})
    }

    /// End the session only if it is still the one identified by `token`.
    pub fn end_if(&self, token: SessionToken) -> Option<Arc<Session>> {
        self.end_with(Some(token), |_| {})
    }

    /// End the session matching `token` (any session for `None`).
    ///
    /// `on_end` runs before the slot is released, so no other task observes
    /// the empty slot until it returns. It must not touch this `SessionState`.
    pub fn end_with(
        &self,
        token: Option<SessionToken>,
        on_end: impl FnOnce(&Session),
    ) -> Option<Arc<Session>> {
        let mut ended = None;
        self.current.send_if_modified(|slot| {
            let matches = slot
                .as_ref()
                .is_some_and(|s| token.is_none_or(|token| s.token == token));
            if matches {
                ended = slot.take();
                if let Some(session) = &ended {
                    on_end(session);
                }
            }
            matches
        });
        ended
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.borrow().clone()
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|s| s.token == token)
    }

    /// Run `apply` only while `token` is current.
    ///
    /// The slot stays read-locked for the duration of `apply`, so the session
    /// cannot end between the check and the update. `apply` must not touch
    /// this `SessionState`.
    pub fn apply_if_current<R>(&self, token: SessionToken, apply: impl FnOnce() -> R) -> Option<R> {
        let slot = self.current.borrow();
        if slot.as_ref().is_some_and(|s| s.token == token) {
            Some(apply())
        } else {
            None
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.current.subscribe()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

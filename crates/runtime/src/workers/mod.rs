//! Background workers owned by a connected session.
//!
//! The reconciler keeps the snapshot fresh and the guard watches the wallet.
//! Both are spawned on connect and stop when their session ends.

mod guard;
mod reconciler;
mod task;

pub use guard::{SessionGuard, Teardown};
pub use reconciler::{Reconciler, ReconcilerWorker, RefreshOutcome};
pub use task::PollTask;

//! Client orchestrator.
//!
//! [`GameClient`] owns the wallet session, the snapshot store and the
//! per-session workers, and exposes the read and transaction API frontends
//! drive. It is a cheap cloneable handle; clones share everything.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use client_blockchain_core::{
    ChainInfo, FeeSchedule, GameGateway, TxHash, WalletError, WalletProvider,
};
use game_core::{
    Address, Amount, GameAction, LeaderboardEntry, ValidationError, ensure_admin,
    ensure_number_available, ensure_round_open, ensure_sufficient_balance, parse_guess_number,
    parse_pool_amount, parse_round_id,
};

use crate::api::{ClientError, Result};
use crate::events::{DisconnectReason, Event, EventBus, SessionEvent, Topic};
use crate::leaderboard::load_leaderboard;
use crate::session::{Session, SessionState};
use crate::snapshot::{GameSnapshot, SnapshotStore};
use crate::workers::{
    PollTask, Reconciler, ReconcilerWorker, RefreshOutcome, SessionGuard, Teardown,
};

/// Runtime configuration shared across the client and its workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Period of the game state refresh loop.
    pub refresh_interval: Duration,
    /// Period of the wallet account check.
    pub wallet_poll_interval: Duration,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(5),
            wallet_poll_interval: Duration::from_secs(3),
            event_buffer_size: 100,
        }
    }
}

struct Inner {
    config: RuntimeConfig,
    gateway: Arc<dyn GameGateway>,
    wallet: Arc<dyn WalletProvider>,
    chain_info: ChainInfo,
    sessions: SessionState,
    snapshots: SnapshotStore,
    events: EventBus,
    reconciler: Reconciler,
    teardown: Teardown,
    tasks: Mutex<Vec<PollTask>>,
}

/// Handle to the guessing game client.
#[derive(Clone)]
pub struct GameClient {
    inner: Arc<Inner>,
}

impl GameClient {
    /// Create a new client builder
    pub fn builder() -> GameClientBuilder {
        GameClientBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn chain_info(&self) -> &ChainInfo {
        &self.inner.chain_info
    }

    pub fn fees(&self) -> &FeeSchedule {
        self.inner.gateway.fees()
    }

    /// Subscribe to a specific event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe(topic)
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Connect the wallet and start the session workers.
    ///
    /// Registers the chain, asks for access and takes the first exposed
    /// account. Any wallet failure leaves the client disconnected. A previous
    /// session is ended first.
    pub async fn connect(&self) -> Result<Address> {
        let result = self.open_session().await;
        self.report("Failed to connect wallet", result)
    }

    async fn open_session(&self) -> Result<Address> {
        let inner = &self.inner;
        let chain_id = inner.chain_info.chain_id.as_str();

        inner.wallet.suggest_chain(&inner.chain_info).await?;
        inner.wallet.enable(chain_id).await?;
        let account = inner
            .wallet
            .accounts(chain_id)
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccounts)?;
        let signer = inner.wallet.signer(chain_id).await?;

        self.close_session(DisconnectReason::UserRequested).await;

        let session = inner.sessions.begin(account.address.clone(), signer);
        info!(address = %session.address, chain_id, "Wallet connected");
        inner.events.publish(Event::Session(SessionEvent::Connected {
            address: session.address.clone(),
        }));
        inner
            .events
            .success(format!("Connected as {}", session.address.short()));

        self.spawn_workers(&session, chain_id);
        inner.reconciler.reconcile(session.token).await;

        Ok(account.address)
    }

    fn spawn_workers(&self, session: &Session, chain_id: &str) {
        let inner = &self.inner;

        let reconciler = ReconcilerWorker::new(
            inner.reconciler.clone(),
            session.token,
            inner.config.refresh_interval,
        );
        let guard = SessionGuard::new(
            inner.wallet.clone(),
            chain_id,
            session.token,
            session.address.clone(),
            inner.config.wallet_poll_interval,
            inner.teardown.clone(),
        );

        let mut tasks = self.tasks();
        tasks.push(PollTask::spawn("reconciler", |shutdown| reconciler.run(shutdown)));
        tasks.push(PollTask::spawn("session-guard", |shutdown| guard.run(shutdown)));
    }

    /// End the session and stop its workers.
    ///
    /// Returns false when no session was active.
    pub async fn disconnect(&self) -> bool {
        self.close_session(DisconnectReason::UserRequested).await
    }

    async fn close_session(&self, reason: DisconnectReason) -> bool {
        let ended = self.inner.teardown.end(None, reason);
        let tasks: Vec<PollTask> = self.tasks().drain(..).collect();
        for task in tasks {
            debug!("Stopping {} worker", task.name());
            task.cancel().await;
        }
        ended
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<PollTask>> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn address(&self) -> Option<Address> {
        self.inner.sessions.current().map(|s| s.address.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.inner.sessions.current().is_some()
    }

    fn require_session(&self) -> Result<Arc<Session>> {
        self.inner
            .sessions
            .current()
            .ok_or_else(|| ValidationError::NotConnected.into())
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Last applied snapshot, `None` before the first refresh or after
    /// disconnect.
    pub fn snapshot(&self) -> Option<Arc<GameSnapshot>> {
        self.inner.snapshots.current()
    }

    pub fn watch_snapshots(&self) -> watch::Receiver<Option<Arc<GameSnapshot>>> {
        self.inner.snapshots.subscribe()
    }

    /// Refresh the snapshot now.
    ///
    /// Query failures are already reported on the status topic by the
    /// reconciler.
    pub async fn refresh(&self) -> Result<()> {
        let session = self.report("Error refreshing game state", self.require_session())?;
        match self.inner.reconciler.reconcile(session.token).await {
            RefreshOutcome::Applied { .. } => Ok(()),
            RefreshOutcome::Discarded => Err(ClientError::SessionEnded),
            RefreshOutcome::Failed(e) => Err(e.into()),
        }
    }

    /// Balance of the connected account in the game denomination.
    pub async fn balance(&self) -> Result<Amount> {
        let result = self.fetch_balance().await;
        self.report("Error fetching balance", result)
    }

    async fn fetch_balance(&self) -> Result<Amount> {
        let session = self.require_session()?;
        Ok(self.inner.gateway.balance(&session.address).await?)
    }

    /// Top players across every round.
    ///
    /// Uses the snapshot's game state when one is loaded and queries it
    /// otherwise, so it also works without a wallet.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let result = self.fetch_leaderboard().await;
        self.report("Error loading leaderboard", result)
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let state = match self.snapshot() {
            Some(snapshot) => snapshot.game_state.clone(),
            None => self.inner.gateway.get_game_state().await?,
        };
        Ok(load_leaderboard(self.inner.gateway.as_ref(), &state).await?)
    }

    // ------------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------------

    /// Validate and submit a guess.
    ///
    /// Nothing is sent unless the number is in range and free, the round is
    /// funded and below `round_end` at the latest height, and the account
    /// holds at least the guess fee right now.
    pub async fn submit_guess(&self, input: &str) -> Result<TxHash> {
        let result = self.guess(input).await;
        self.report("Error submitting guess", result)
    }

    async fn guess(&self, input: &str) -> Result<TxHash> {
        let session = self.require_session()?;
        let snapshot = self.snapshot().ok_or(ValidationError::StateUnavailable)?;
        let state = &snapshot.game_state;

        let number = parse_guess_number(input, state.max_guesses)?;
        ensure_number_available(number, &snapshot.board())?;

        let gateway = &self.inner.gateway;
        let fees = gateway.fees();
        let (height, balance) = tokio::try_join!(
            gateway.latest_block_height(),
            gateway.balance(&session.address),
        )?;
        ensure_round_open(state, height)?;
        ensure_sufficient_balance(balance, fees.guess_fee, &fees.denom)?;

        self.execute(&session, GameAction::Guess { number }).await
    }

    pub async fn claim_prize(&self, round_input: &str) -> Result<TxHash> {
        let result = self.claim(round_input).await;
        self.report("Error claiming prize", result)
    }

    async fn claim(&self, round_input: &str) -> Result<TxHash> {
        let session = self.require_session()?;
        let round_id = parse_round_id(round_input)?;
        self.execute(&session, GameAction::ClaimPrize { round_id })
            .await
    }

    /// Fund the current round's pool. Admin only.
    pub async fn add_funds_to_pool(&self, amount_input: &str) -> Result<TxHash> {
        let result = self.add_funds(amount_input).await;
        self.report("Error adding funds", result)
    }

    async fn add_funds(&self, amount_input: &str) -> Result<TxHash> {
        let session = self.require_admin()?;
        let amount = parse_pool_amount(amount_input)?;
        self.execute(&session, GameAction::AddFundsToPool { amount })
            .await
    }

    /// Sweep a finished round's unclaimed pool. Admin only.
    pub async fn collect_unclaimed_pool(&self, round_input: &str) -> Result<TxHash> {
        let result = self.collect(round_input).await;
        self.report("Error collecting unclaimed pool", result)
    }

    async fn collect(&self, round_input: &str) -> Result<TxHash> {
        let session = self.require_admin()?;
        let round_id = parse_round_id(round_input)?;
        self.execute(&session, GameAction::CollectUnclaimedPool { round_id })
            .await
    }

    fn require_admin(&self) -> Result<Arc<Session>> {
        let session = self.require_session()?;
        let snapshot = self.snapshot().ok_or(ValidationError::StateUnavailable)?;
        ensure_admin(&snapshot.game_state, &session.address)?;
        Ok(session)
    }

    /// Send `action` as the session's account and refresh on success.
    async fn execute(&self, session: &Session, action: GameAction) -> Result<TxHash> {
        let done = success_text(&action);
        let hash = self
            .inner
            .gateway
            .execute(session.signer.as_ref(), &session.address, action)
            .await?;

        self.inner.events.success(format!("{done}: {hash}"));

        if self.inner.sessions.is_current(session.token) {
            self.inner.reconciler.reconcile(session.token).await;
        }
        Ok(hash)
    }

    /// Publish a failed `result` on the status topic and pass it through.
    fn report<T>(&self, context: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            let text = match e {
                ClientError::Validation(_) | ClientError::SessionEnded => e.to_string(),
                _ => format!("{context}: {e}"),
            };
            self.inner.events.error(text);
        }
        result
    }
}

fn success_text(action: &GameAction) -> String {
    match action {
        GameAction::Guess { number } => format!("Guess {number} submitted"),
        GameAction::ClaimPrize { round_id } => format!("Prize for round {round_id} claimed"),
        GameAction::AddFundsToPool { .. } => "Funds added to pool".to_string(),
        GameAction::CollectUnclaimedPool { round_id } => {
            format!("Unclaimed pool of round {round_id} collected")
        }
    }
}

/// Builder for [`GameClient`].
pub struct GameClientBuilder {
    config: RuntimeConfig,
    gateway: Option<Arc<dyn GameGateway>>,
    wallet: Option<Arc<dyn WalletProvider>>,
    chain_info: Option<ChainInfo>,
}

impl GameClientBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            gateway: None,
            wallet: None,
            chain_info: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the contract gateway (required)
    pub fn gateway(mut self, gateway: impl GameGateway + 'static) -> Self {
        self.gateway = Some(Arc::new(gateway));
        self
    }

    /// Set the wallet provider (required)
    pub fn wallet(mut self, wallet: impl WalletProvider + 'static) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    /// Set an already shared wallet provider
    pub fn shared_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Set the chain registration payload (required)
    pub fn chain_info(mut self, chain_info: ChainInfo) -> Self {
        self.chain_info = Some(chain_info);
        self
    }

    pub fn build(self) -> Result<GameClient> {
        let gateway = self
            .gateway
            .ok_or(ClientError::MissingComponent("gateway"))?;
        let wallet = self.wallet.ok_or(ClientError::MissingComponent("wallet"))?;
        let chain_info = self
            .chain_info
            .ok_or(ClientError::MissingComponent("chain info"))?;

        let sessions = SessionState::new();
        let snapshots = SnapshotStore::new();
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let reconciler = Reconciler::new(
            gateway.clone(),
            sessions.clone(),
            snapshots.clone(),
            events.clone(),
        );
        let teardown = Teardown::new(sessions.clone(), snapshots.clone(), events.clone());

        Ok(GameClient {
            inner: Arc::new(Inner {
                config: self.config,
                gateway,
                wallet,
                chain_info,
                sessions,
                snapshots,
                events,
                reconciler,
                teardown,
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }
}

//! Mock gateway and wallet for testing.
//!
//! Both simulate the chain and the wallet in memory. Clones share state, so a
//! test can keep a handle and script the chain while a client runs against it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use game_core::{Address, Amount, BlockHeight, GameAction, GameState, Guess, RoundId};
use tokio::sync::{Notify, broadcast};

use crate::traits::{
    GameGateway, GatewayError, TransactionSigner, TransportError, WalletError, WalletProvider,
};
use crate::types::{Account, ChainInfo, ExecuteRequest, FeeSchedule, KeystoreEvent, TxHash};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Number of gateway calls per operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub game_state: usize,
    pub guesses: usize,
    pub all_guesses: usize,
    pub winner: usize,
    pub block_height: usize,
    pub balance: usize,
    pub execute: usize,
}

impl CallCounts {
    /// Read-only calls of any kind.
    pub fn queries(&self) -> usize {
        self.game_state + self.guesses + self.all_guesses + self.winner + self.block_height + self.balance
    }

    pub fn total(&self) -> usize {
        self.queries() + self.execute
    }
}

#[derive(Default)]
struct MockChain {
    state: Option<GameState>,
    guesses: Vec<Guess>,
    all_guesses: Vec<Guess>,
    winners: HashMap<RoundId, Vec<Address>>,
    failing_winner_rounds: HashSet<RoundId>,
    height: BlockHeight,
    balances: HashMap<Address, Amount>,
    fail_queries: Option<String>,
    reject_execute: Option<String>,
    counts: CallCounts,
    executed: Vec<(Address, GameAction)>,
}

/// Holds `get_game_state` calls until released.
#[derive(Clone, Default)]
pub struct QueryGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl QueryGate {
    /// Wait until a held query has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one held query finish.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// In-memory guessing contract.
#[derive(Clone)]
pub struct MockGateway {
    chain: Arc<Mutex<MockChain>>,
    gate: Arc<Mutex<Option<QueryGate>>>,
    fees: FeeSchedule,
    contract: Address,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            chain: Arc::new(Mutex::new(MockChain::default())),
            gate: Arc::new(Mutex::new(None)),
            fees: FeeSchedule::default(),
            contract: Address::new("mock-contract"),
        }
    }

    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn set_state(&self, state: GameState) {
        lock(&self.chain).state = Some(state);
    }

    pub fn update_state(&self, f: impl FnOnce(&mut GameState)) {
        if let Some(state) = lock(&self.chain).state.as_mut() {
            f(state);
        }
    }

    pub fn state(&self) -> Option<GameState> {
        lock(&self.chain).state.clone()
    }

    pub fn set_height(&self, height: BlockHeight) {
        lock(&self.chain).height = height;
    }

    pub fn set_balance(&self, address: impl Into<Address>, amount: Amount) {
        lock(&self.chain).balances.insert(address.into(), amount);
    }

    /// Replace the current-round listing.
    pub fn set_guesses(&self, guesses: Vec<Guess>) {
        lock(&self.chain).guesses = guesses;
    }

    /// Replace the all-round listing.
    pub fn set_all_guesses(&self, guesses: Vec<Guess>) {
        lock(&self.chain).all_guesses = guesses;
    }

    pub fn set_winners(&self, round_id: RoundId, winners: Vec<Address>) {
        lock(&self.chain).winners.insert(round_id, winners);
    }

    pub fn fail_winner_lookup(&self, round_id: RoundId) {
        lock(&self.chain).failing_winner_rounds.insert(round_id);
    }

    /// Make every read fail with a network error until cleared with `None`.
    pub fn fail_queries(&self, reason: Option<&str>) {
        lock(&self.chain).fail_queries = reason.map(str::to_string);
    }

    /// Make the contract reject executes until cleared with `None`.
    pub fn reject_execute(&self, reason: Option<&str>) {
        lock(&self.chain).reject_execute = reason.map(str::to_string);
    }

    /// Hold every subsequent `get_game_state` until the gate is released.
    pub fn hold_game_state(&self) -> QueryGate {
        let gate = QueryGate::default();
        *lock(&self.gate) = Some(gate.clone());
        gate
    }

    pub fn clear_gate(&self) {
        lock(&self.gate).take();
    }

    pub fn counts(&self) -> CallCounts {
        lock(&self.chain).counts.clone()
    }

    pub fn executed(&self) -> Vec<(Address, GameAction)> {
        lock(&self.chain).executed.clone()
    }

    fn read<T>(
        &self,
        count: impl FnOnce(&mut CallCounts),
        read: impl FnOnce(&MockChain) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        let mut chain = lock(&self.chain);
        count(&mut chain.counts);
        if let Some(reason) = &chain.fail_queries {
            return Err(TransportError::Network(reason.clone()).into());
        }
        read(&chain)
    }

    fn apply(chain: &mut MockChain, fees: &FeeSchedule, sender: &Address, action: &GameAction) {
        let Some(state) = chain.state.as_mut() else {
            return;
        };
        match *action {
            GameAction::Guess { number } => {
                state.guess_count += 1;
                state.pool = state.pool.saturating_add(fees.guess_fee);
                let guess = Guess::new(sender.clone(), number, state.round_id);
                chain.guesses.push(guess.clone());
                chain.all_guesses.push(guess);
            }
            GameAction::AddFundsToPool { amount } => {
                state.pool = state.pool.saturating_add(amount);
            }
            GameAction::ClaimPrize { .. } | GameAction::CollectUnclaimedPool { .. } => {}
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameGateway for MockGateway {
    async fn get_game_state(&self) -> Result<GameState, GatewayError> {
        let gate = lock(&self.gate).clone();
        lock(&self.chain).counts.game_state += 1;
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.read(
            |_| {},
            |chain| {
                chain.state.clone().ok_or_else(|| GatewayError::MalformedResponse {
                    operation: "get_game_state",
                    reason: "contract not instantiated".to_string(),
                })
            },
        )
    }

    async fn get_guesses(&self) -> Result<Vec<Guess>, GatewayError> {
        self.read(|c| c.guesses += 1, |chain| Ok(chain.guesses.clone()))
    }

    async fn get_all_guesses(&self) -> Result<Vec<Guess>, GatewayError> {
        self.read(|c| c.all_guesses += 1, |chain| Ok(chain.all_guesses.clone()))
    }

    async fn get_winner(&self, round_id: RoundId) -> Result<Vec<Address>, GatewayError> {
        self.read(
            |c| c.winner += 1,
            |chain| {
                if chain.failing_winner_rounds.contains(&round_id) {
                    return Err(GatewayError::ExecutionRejected(format!(
                        "no winner recorded for round {round_id}"
                    )));
                }
                Ok(chain.winners.get(&round_id).cloned().unwrap_or_default())
            },
        )
    }

    async fn latest_block_height(&self) -> Result<BlockHeight, GatewayError> {
        self.read(|c| c.block_height += 1, |chain| Ok(chain.height))
    }

    async fn balance(&self, address: &Address) -> Result<Amount, GatewayError> {
        self.read(
            |c| c.balance += 1,
            |chain| Ok(chain.balances.get(address).copied().unwrap_or_default()),
        )
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
        {
            let mut chain = lock(&self.chain);
            chain.counts.execute += 1;
            if let Some(reason) = &chain.reject_execute {
                return Err(GatewayError::ExecutionRejected(reason.clone()));
            }
        }

        let request = ExecuteRequest::for_action(&self.contract, sender, &self.fees, &action)
            .map_err(|e| GatewayError::ExecutionRejected(e.to_string()))?;
        let hash = signer.sign_and_broadcast(request).await?;

        let mut chain = lock(&self.chain);
        Self::apply(&mut chain, &self.fees, sender, &action);
        chain.executed.push((sender.clone(), action));
        Ok(hash)
    }
}

// ============================================================================
// Wallet
// ============================================================================

#[derive(Default)]
struct WalletState {
    accounts: Vec<Account>,
    locked: bool,
    unavailable: bool,
    reject_chain: bool,
    enable_error: Option<WalletError>,
    suggested: Vec<ChainInfo>,
    broadcasts: Vec<ExecuteRequest>,
    enable_calls: usize,
    accounts_calls: usize,
}

/// In-memory wallet that also acts as its own signer.
#[derive(Clone)]
pub struct MockWallet {
    state: Arc<Mutex<WalletState>>,
    keystore: broadcast::Sender<KeystoreEvent>,
    tx_counter: Arc<AtomicU64>,
}

impl MockWallet {
    pub fn new(address: impl Into<Address>) -> Self {
        let (keystore, _) = broadcast::channel(16);
        Self {
            state: Arc::new(Mutex::new(WalletState {
                accounts: vec![Account::new(address)],
                ..WalletState::default()
            })),
            keystore,
            tx_counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Make `address` the active account.
    pub fn switch_account(&self, address: impl Into<Address>) {
        lock(&self.state).accounts = vec![Account::new(address)];
    }

    pub fn clear_accounts(&self) {
        lock(&self.state).accounts.clear();
    }

    pub fn lock(&self) {
        lock(&self.state).locked = true;
    }

    pub fn unlock(&self) {
        lock(&self.state).locked = false;
    }

    /// Simulate a missing extension.
    pub fn set_unavailable(&self, unavailable: bool) {
        lock(&self.state).unavailable = unavailable;
    }

    pub fn reject_chain(&self, reject: bool) {
        lock(&self.state).reject_chain = reject;
    }

    /// Make `enable` fail with `error` until cleared with `None`.
    pub fn fail_enable(&self, error: Option<WalletError>) {
        lock(&self.state).enable_error = error;
    }

    pub fn trigger_keystore_change(&self) {
        // No subscribers simply means nobody is listening.
        let _ = self.keystore.send(KeystoreEvent::Changed);
    }

    pub fn keystore_subscribers(&self) -> usize {
        self.keystore.receiver_count()
    }

    pub fn suggested_chains(&self) -> Vec<ChainInfo> {
        lock(&self.state).suggested.clone()
    }

    pub fn broadcasts(&self) -> Vec<ExecuteRequest> {
        lock(&self.state).broadcasts.clone()
    }

    pub fn enable_calls(&self) -> usize {
        lock(&self.state).enable_calls
    }

    pub fn accounts_calls(&self) -> usize {
        lock(&self.state).accounts_calls
    }

    fn check_reachable(state: &WalletState) -> Result<(), WalletError> {
        if state.unavailable {
            return Err(WalletError::ExtensionUnavailable);
        }
        if state.locked {
            return Err(WalletError::Locked);
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn suggest_chain(&self, info: &ChainInfo) -> Result<(), WalletError> {
        let mut state = lock(&self.state);
        if state.unavailable {
            return Err(WalletError::ExtensionUnavailable);
        }
        if state.reject_chain {
            return Err(WalletError::ChainRejected {
                chain_id: info.chain_id.clone(),
                reason: "user rejected the request".to_string(),
            });
        }
        state.suggested.push(info.clone());
        Ok(())
    }

    async fn enable(&self, _chain_id: &str) -> Result<(), WalletError> {
        let mut state = lock(&self.state);
        state.enable_calls += 1;
        Self::check_reachable(&state)?;
        match &state.enable_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn accounts(&self, _chain_id: &str) -> Result<Vec<Account>, WalletError> {
        let mut state = lock(&self.state);
        state.accounts_calls += 1;
        Self::check_reachable(&state)?;
        Ok(state.accounts.clone())
    }

    fn keystore_changes(&self) -> broadcast::Receiver<KeystoreEvent> {
        self.keystore.subscribe()
    }

    async fn signer(&self, _chain_id: &str) -> Result<Arc<dyn TransactionSigner>, WalletError> {
        Self::check_reachable(&lock(&self.state))?;
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl TransactionSigner for MockWallet {
    async fn sign_and_broadcast(&self, request: ExecuteRequest) -> Result<TxHash, WalletError> {
        let mut state = lock(&self.state);
        Self::check_reachable(&state)?;
        if !state.accounts.iter().any(|a| a.address == request.sender) {
            return Err(WalletError::Broadcast(format!(
                "no key for sender {}",
                request.sender
            )));
        }
        state.broadcasts.push(request);
        let n = self.tx_counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(TxHash(format!("MOCKTX{n:04}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState {
            admin: Address::new("admin"),
            pool: Amount::new(1_000),
            target_number: 0,
            round_id: RoundId(2),
            round_end: 100,
            round_duration: 50,
            guess_count: 0,
            max_guesses: 10,
        }
    }

    #[tokio::test]
    async fn execute_signs_and_updates_state() {
        let gateway = MockGateway::new();
        gateway.set_state(state());
        let wallet = MockWallet::new("player");

        let hash = gateway
            .execute(&wallet, &Address::new("player"), GameAction::Guess { number: 4 })
            .await
            .unwrap();

        assert_eq!(hash.as_str(), "MOCKTX0001");
        assert_eq!(wallet.broadcasts().len(), 1);
        let state = gateway.state().unwrap();
        assert_eq!(state.guess_count, 1);
        assert_eq!(state.pool, Amount::new(15_000_001_000));
        assert_eq!(gateway.get_guesses().await.unwrap()[0].number, 4);
        assert_eq!(gateway.counts().execute, 1);
    }

    #[tokio::test]
    async fn locked_wallet_refuses_everything() {
        let wallet = MockWallet::new("player");
        wallet.lock();
        assert!(matches!(wallet.enable("c").await, Err(WalletError::Locked)));
        assert!(matches!(wallet.accounts("c").await, Err(WalletError::Locked)));
        assert!(wallet.signer("c").await.is_err());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_errors() {
        let gateway = MockGateway::new();
        gateway.set_state(state());
        gateway.fail_queries(Some("offline"));
        assert!(matches!(
            gateway.get_game_state().await,
            Err(GatewayError::Transport(TransportError::Network(_)))
        ));
        assert_eq!(gateway.counts().game_state, 1);

        gateway.fail_queries(None);
        gateway.fail_winner_lookup(RoundId(1));
        assert!(gateway.get_winner(RoundId(1)).await.is_err());
        assert!(gateway.get_winner(RoundId(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keystore_changes_reach_subscribers() {
        let wallet = MockWallet::new("player");
        let mut rx = wallet.keystore_changes();
        wallet.trigger_keystore_change();
        assert_eq!(rx.recv().await.unwrap(), KeystoreEvent::Changed);
    }
}

#![allow(dead_code)]

use client_blockchain_core::{ChainInfo, Currency, MockGateway, MockWallet};
use game_core::{Address, Amount, GameState, Guess, RoundId};
use runtime::{Event, GameClient, StatusMessage};
use tokio::sync::broadcast;

pub const PLAYER: &str = "shareledger1player";
pub const OTHER: &str = "shareledger1other";
pub const ADMIN: &str = "shareledger1admin";
pub const CHAIN_ID: &str = "ShareRing-KUD";

/// Round 3, funded, closing at block 1000, one number already taken.
pub fn round_three() -> GameState {
    GameState {
        admin: Address::new(ADMIN),
        pool: Amount::new(5_000_000_000),
        target_number: 0,
        round_id: RoundId(3),
        round_end: 1000,
        round_duration: 600,
        guess_count: 1,
        max_guesses: 100,
    }
}

pub fn chain_info() -> ChainInfo {
    ChainInfo::cosmwasm(
        CHAIN_ID,
        "ShareRing Testnet",
        "http://localhost:3001",
        "https://lcd-testnet.shareri.ng",
        Currency {
            coin_denom: "SHR".to_string(),
            coin_minimal_denom: "nshr".to_string(),
            coin_decimals: 9,
        },
        "shareledger",
    )
}

pub struct Harness {
    pub client: GameClient,
    pub gateway: MockGateway,
    pub wallet: MockWallet,
}

pub fn harness_for(account: &str) -> Harness {
    let gateway = MockGateway::new();
    gateway.set_state(round_three());
    gateway.set_height(900);
    gateway.set_guesses(vec![Guess::new(OTHER, 7, RoundId(3))]);
    gateway.set_balance(PLAYER, Amount::new(20_000_000_000));
    gateway.set_balance(ADMIN, Amount::new(20_000_000_000));

    let wallet = MockWallet::new(account);
    let client = GameClient::builder()
        .gateway(gateway.clone())
        .wallet(wallet.clone())
        .chain_info(chain_info())
        .build()
        .expect("all components provided");

    Harness {
        client,
        gateway,
        wallet,
    }
}

pub fn harness() -> Harness {
    harness_for(PLAYER)
}

/// Status lines published so far.
pub fn drain_status(rx: &mut broadcast::Receiver<Event>) -> Vec<StatusMessage> {
    let mut messages = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::Status(message) = event {
            messages.push(message);
        }
    }
    messages
}

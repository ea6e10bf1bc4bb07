//! Commands run end to end against the in-memory gateway and wallet.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use client_blockchain_core::{ChainInfo, Currency, MockGateway, MockWallet};
use client_frontend_cli::{CliConfig, CliFrontend, Command, FrontendConfig};
use client_frontend_core::Frontend;
use game_core::{Address, Amount, GameState, Guess, RoundId};
use runtime::GameClient;

const PLAYER: &str = "shareledger1player";
const ADMIN: &str = "shareledger1admin";

#[derive(Clone, Default)]
struct Output(Arc<Mutex<Vec<u8>>>);

impl Output {
    fn text(&self) -> String {
        let bytes = self.0.lock().unwrap().clone();
        console::strip_ansi_codes(&String::from_utf8(bytes).unwrap()).to_string()
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn setup() -> (GameClient, MockGateway, MockWallet) {
    let gateway = MockGateway::new();
    gateway.set_state(GameState {
        admin: Address::new(ADMIN),
        pool: Amount::new(5_000_000_000),
        target_number: 0,
        round_id: RoundId(2),
        round_end: 1000,
        round_duration: 600,
        guess_count: 1,
        max_guesses: 20,
    });
    gateway.set_height(950);
    gateway.set_guesses(vec![Guess::new(ADMIN, 3, RoundId(2))]);
    gateway.set_balance(PLAYER, Amount::new(20_000_000_000));

    let wallet = MockWallet::new(PLAYER);
    let chain_info = ChainInfo::cosmwasm(
        "ShareRing-KUD",
        "ShareRing Testnet",
        "http://localhost:3001",
        "https://lcd-testnet.shareri.ng",
        Currency {
            coin_denom: "SHR".to_string(),
            coin_minimal_denom: "nshr".to_string(),
            coin_decimals: 9,
        },
        "shareledger",
    );
    let client = GameClient::builder()
        .gateway(gateway.clone())
        .wallet(wallet.clone())
        .chain_info(chain_info)
        .build()
        .unwrap();
    (client, gateway, wallet)
}

async fn run(command: Command, client: &GameClient) -> (anyhow::Result<()>, String) {
    let output = Output::default();
    let mut frontend = CliFrontend::new(command, FrontendConfig::default(), CliConfig::default())
        .with_output(output.clone());
    let result = frontend.run(client.clone()).await;
    (result, output.text())
}

#[tokio::test(start_paused = true)]
async fn status_prints_the_round_and_disconnects() {
    let (client, _gateway, _wallet) = setup();
    let (result, text) = run(Command::Status, &client).await;

    result.unwrap();
    assert!(text.contains("=== Round 2 ==="));
    assert!(text.contains("Pool: 5.00 SHR"));
    assert!(text.contains("open, 50 blocks left"));
    assert!(text.contains("19 available, 1 taken"));
    assert!(text.contains("Connected as"));
    assert!(!client.is_connected());
}

#[tokio::test(start_paused = true)]
async fn guess_reports_the_transaction() {
    let (client, gateway, wallet) = setup();
    let (result, text) = run(
        Command::Guess {
            number: "4".to_string(),
        },
        &client,
    )
    .await;

    result.unwrap();
    assert_eq!(wallet.broadcasts().len(), 1);
    assert_eq!(gateway.counts().execute, 1);
    assert!(text.contains("Guess 4 submitted: MOCKTX0001"));
}

#[tokio::test(start_paused = true)]
async fn invalid_guess_fails_without_a_transaction() {
    let (client, gateway, _wallet) = setup();
    let (result, text) = run(
        Command::Guess {
            number: "3".to_string(),
        },
        &client,
    )
    .await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").starts_with("Guess failed"));
    assert!(text.contains("number 3 has already been guessed this round"));
    assert_eq!(gateway.counts().execute, 0);
}

#[tokio::test(start_paused = true)]
async fn leaderboard_needs_no_wallet() {
    let (client, gateway, wallet) = setup();
    gateway.set_all_guesses(vec![
        Guess::new(PLAYER, 1, RoundId(1)),
        Guess::new(ADMIN, 3, RoundId(2)),
    ]);
    gateway.set_winners(RoundId(1), vec![Address::new(PLAYER)]);

    let (result, text) = run(Command::Leaderboard, &client).await;

    result.unwrap();
    assert_eq!(wallet.enable_calls(), 0);
    let lines: Vec<_> = text.lines().collect();
    assert!(lines[2].contains("shareledge...ayer"));
    assert!(lines[2].trim_end().ends_with('1'));
}

#[tokio::test(start_paused = true)]
async fn watch_prints_each_refresh_then_stops() {
    let (client, gateway, _wallet) = setup();
    let (result, text) = run(Command::Watch { updates: Some(2) }, &client).await;

    result.unwrap();
    assert_eq!(text.matches("=== Round 2 ===").count(), 3);
    assert_eq!(gateway.counts().game_state, 3);
}

#[tokio::test(start_paused = true)]
async fn watch_ends_when_the_wallet_switches_account() {
    let (client, _gateway, wallet) = setup();
    let watcher = client.clone();
    let task = tokio::spawn(async move {
        run(Command::Watch { updates: None }, &watcher).await
    });

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    wallet.switch_account(ADMIN);
    let (result, text) = task.await.unwrap();

    assert!(result.unwrap_err().to_string().starts_with("Session ended"));
    assert!(text.contains("Disconnected"));
}

//! Key wallet signing and broadcasting against a loopback LCD stub.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use client_blockchain_core::{
    ContractGateway, FeeSchedule, GameGateway, GatewayError, WalletError, WalletProvider,
};
use client_blockchain_cosmwasm::{KeyWallet, LcdClient, Mnemonic};
use cosmrs::cosmwasm::MsgExecuteContract;
use cosmrs::tx::Msg;
use game_core::{Address, Amount, GameAction, RoundId};
use serde_json::{Value, json};

const CONTRACT: &str = "shareledger1hyja4uyjktpeh0fxzuw2fmjudr85rk2qu98fa6nuh6d4qru9l0sscg22hg";
const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const CHAIN_ID: &str = "ShareRing-KUD";

/// What the stub saw in each broadcast transaction.
#[derive(Debug, Clone)]
struct Seen {
    sender: String,
    contract: String,
    msg: Value,
    funds: Vec<(String, u128)>,
    sequence: u64,
    memo: String,
}

#[derive(Clone, Default)]
struct Lcd {
    seen: Arc<Mutex<Vec<Seen>>>,
    reject_code: u32,
}

async fn account(Path(address): Path<String>) -> Json<Value> {
    Json(json!({
        "account": {
            "@type": "/cosmos.auth.v1beta1.BaseAccount",
            "address": address,
            "pub_key": null,
            "account_number": "21",
            "sequence": "7"
        }
    }))
}

async fn broadcast(State(lcd): State<Lcd>, Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["mode"], "BROADCAST_MODE_SYNC");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body["tx_bytes"].as_str().unwrap())
        .unwrap();
    let tx = cosmrs::Tx::from_bytes(&bytes).unwrap();
    let execute = MsgExecuteContract::from_any(&tx.body.messages[0]).unwrap();

    lcd.seen.lock().unwrap().push(Seen {
        sender: execute.sender.to_string(),
        contract: execute.contract.to_string(),
        msg: serde_json::from_slice(&execute.msg).unwrap(),
        funds: execute
            .funds
            .iter()
            .map(|coin| (coin.denom.to_string(), coin.amount))
            .collect(),
        sequence: tx.auth_info.signer_infos[0].sequence,
        memo: tx.body.memo.clone(),
    });

    let raw_log = if lcd.reject_code == 0 { "" } else { "insufficient funds" };
    Json(json!({
        "tx_response": {
            "txhash": "A1B2C3",
            "code": lcd.reject_code,
            "raw_log": raw_log
        }
    }))
}

async fn spawn_lcd(lcd: Lcd) -> String {
    let app = Router::new()
        .route("/cosmos/auth/v1beta1/accounts/:address", get(account))
        .route("/cosmos/tx/v1beta1/txs", post(broadcast))
        .with_state(lcd);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn setup(base: &str) -> (KeyWallet, ContractGateway<LcdClient>) {
    let wallet =
        KeyWallet::from_mnemonic(&Mnemonic::new(PHRASE), "shareledger", LcdClient::new(base))
            .unwrap();
    let gateway = ContractGateway::new(
        LcdClient::new(base),
        Address::new(CONTRACT),
        FeeSchedule::default(),
    );
    (wallet, gateway)
}

#[tokio::test]
async fn guess_is_signed_with_the_account_sequence_and_broadcast() {
    let lcd = Lcd::default();
    let base = spawn_lcd(lcd.clone()).await;
    let (wallet, gateway) = setup(&base);

    let signer = wallet.signer(CHAIN_ID).await.unwrap();
    let hash = gateway
        .execute(signer.as_ref(), wallet.address(), GameAction::Guess { number: 7 })
        .await
        .unwrap();
    assert_eq!(hash.as_str(), "A1B2C3");

    let seen = lcd.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].sender, wallet.address().as_str());
    assert_eq!(seen[0].contract, CONTRACT);
    assert_eq!(seen[0].msg, json!({"guess": {"number": 7}}));
    assert_eq!(seen[0].funds, vec![("nshr".to_string(), 15_000_000_000)]);
    assert_eq!(seen[0].sequence, 7);
    assert_eq!(seen[0].memo, "Submit guess");
}

#[tokio::test]
async fn admin_funding_attaches_the_chosen_amount() {
    let lcd = Lcd::default();
    let base = spawn_lcd(lcd.clone()).await;
    let (wallet, gateway) = setup(&base);

    let signer = wallet.signer(CHAIN_ID).await.unwrap();
    gateway
        .execute(
            signer.as_ref(),
            wallet.address(),
            GameAction::AddFundsToPool {
                amount: Amount::new(5_000_000_000),
            },
        )
        .await
        .unwrap();
    gateway
        .execute(
            signer.as_ref(),
            wallet.address(),
            GameAction::ClaimPrize { round_id: RoundId(2) },
        )
        .await
        .unwrap();

    let seen = lcd.seen.lock().unwrap().clone();
    assert_eq!(seen[0].funds, vec![("nshr".to_string(), 5_000_000_000)]);
    assert_eq!(seen[1].msg, json!({"claim_prize": {"round_id": 2}}));
    assert!(seen[1].funds.is_empty());
}

#[tokio::test]
async fn failed_check_tx_is_a_broadcast_error() {
    let lcd = Lcd {
        reject_code: 5,
        ..Lcd::default()
    };
    let base = spawn_lcd(lcd).await;
    let (wallet, gateway) = setup(&base);

    let signer = wallet.signer(CHAIN_ID).await.unwrap();
    let err = gateway
        .execute(signer.as_ref(), wallet.address(), GameAction::Guess { number: 1 })
        .await
        .unwrap_err();
    match err {
        GatewayError::Wallet(WalletError::Broadcast(reason)) => {
            assert!(reason.contains("insufficient funds"));
        }
        other => panic!("unexpected error {other}"),
    }
}

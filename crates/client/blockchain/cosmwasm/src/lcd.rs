//! LCD (REST) chain reader.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use client_blockchain_core::{ChainReader, TransportError};
use game_core::{Address, Amount, BlockHeight};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Read-only client for a Cosmos SDK REST endpoint.
///
/// Smart queries are sent as base64 JSON in the request path; every answer is
/// checked for a 2xx status before its body is decoded.
#[derive(Clone)]
pub struct LcdClient {
    base_url: String,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct SmartQueryResponse {
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct LatestBlockResponse {
    block: Option<Block>,
    /// Cosmos SDK >= 0.47 returns `sdk_block` next to the legacy `block`.
    sdk_block: Option<Block>,
}

#[derive(Deserialize)]
struct Block {
    header: Header,
}

#[derive(Deserialize)]
struct Header {
    height: String,
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: Option<BalanceCoin>,
}

#[derive(Deserialize)]
struct BalanceCoin {
    amount: Amount,
}

/// Number and sequence the signer needs for its next transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

#[derive(Deserialize)]
struct AccountResponse {
    account: serde_json::Value,
}

/// Node answer to a broadcast. A non-zero `code` means the check failed.
#[derive(Debug, Clone, Deserialize)]
pub struct TxResponse {
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
}

#[derive(Serialize)]
struct BroadcastRequest<'a> {
    tx_bytes: String,
    mode: &'a str,
}

#[derive(Deserialize)]
struct BroadcastResponse {
    tx_response: TxResponse,
}

impl LcdClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("LCD request: {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("GET {url} failed: {e}")))?;

        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("LCD post: {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("POST {url} failed: {e}")))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read LCD response: {e}")))?;

        serde_json::from_str(&text)
            .map_err(|e| TransportError::Decode(format!("{e}. Raw response: {text}")))
    }

    /// Account number and sequence of `address`.
    ///
    /// Vesting accounts nest the base account one or two levels down.
    pub async fn account(&self, address: &Address) -> Result<AccountInfo, TransportError> {
        let path = format!("/cosmos/auth/v1beta1/accounts/{address}");
        let response: AccountResponse = self.get(&path, &[]).await?;

        ["", "/base_account", "/base_vesting_account/base_account"]
            .iter()
            .filter_map(|pointer| response.account.pointer(pointer))
            .find_map(account_info)
            .ok_or_else(|| {
                TransportError::Decode(format!("Account {address} has no number or sequence"))
            })
    }

    /// Broadcast signed transaction bytes and wait for the mempool check.
    pub async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<TxResponse, TransportError> {
        let request = BroadcastRequest {
            tx_bytes: STANDARD.encode(tx_bytes),
            mode: "BROADCAST_MODE_SYNC",
        };
        let response: BroadcastResponse = self.post("/cosmos/tx/v1beta1/txs", &request).await?;
        Ok(response.tx_response)
    }
}

fn account_info(account: &serde_json::Value) -> Option<AccountInfo> {
    let field = |name: &str| account.get(name)?.as_str()?.parse().ok();
    Some(AccountInfo {
        account_number: field("account_number")?,
        sequence: field("sequence")?,
    })
}

/// Path segment carrying `query` as base64 JSON.
pub fn encode_query(query: &serde_json::Value) -> String {
    URL_SAFE.encode(query.to_string())
}

#[async_trait]
impl ChainReader for LcdClient {
    async fn query_smart(
        &self,
        contract: &Address,
        query: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let path = format!(
            "/cosmwasm/wasm/v1/contract/{}/smart/{}",
            contract,
            encode_query(query)
        );
        let response: SmartQueryResponse = self.get(&path, &[]).await?;
        Ok(response.data)
    }

    async fn latest_block_height(&self) -> Result<BlockHeight, TransportError> {
        let response: LatestBlockResponse = self
            .get("/cosmos/base/tendermint/v1beta1/blocks/latest", &[])
            .await?;
        let block = response
            .sdk_block
            .or(response.block)
            .ok_or_else(|| TransportError::Decode("Latest block response has no block".into()))?;
        let height = block.header.height;
        height
            .parse()
            .map_err(|_| TransportError::Decode(format!("Invalid block height: {height}")))
    }

    async fn balance(&self, address: &Address, denom: &str) -> Result<Amount, TransportError> {
        let path = format!("/cosmos/bank/v1beta1/balances/{address}/by_denom");
        let response: BalanceResponse = self.get(&path, &[("denom", denom)]).await?;
        Ok(response.balance.map(|coin| coin.amount).unwrap_or_default())
    }
}

//! Common types for chain interactions.

use core::fmt;

use game_core::{Address, Amount, GameAction};
use serde::{Deserialize, Serialize};

/// Hash of a broadcast transaction, as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Native token amount in a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(amount: impl Into<Amount>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Fixed transaction fee: coins paid plus the gas limit they buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    #[serde(with = "gas_string")]
    pub gas: u64,
}

/// Cosmos SDK encodes gas limits as decimal strings.
mod gas_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(gas: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(gas)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed costs of playing, in the chain's micro denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub denom: String,
    /// Attached as funds to every guess.
    pub guess_fee: Amount,
    /// Paid on every execute, whatever the action.
    pub tx_fee: Amount,
    pub gas_limit: u64,
}

impl FeeSchedule {
    pub const DEFAULT_DENOM: &'static str = "nshr";
    pub const DEFAULT_GUESS_FEE: Amount = Amount::new(15_000_000_000);
    pub const DEFAULT_TX_FEE: Amount = Amount::new(10_000_000);
    pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

    pub fn fee(&self) -> Fee {
        Fee {
            amount: vec![Coin::new(self.tx_fee, self.denom.clone())],
            gas: self.gas_limit,
        }
    }

    /// Funds attached to the execute message for `action`.
    pub fn funds_for(&self, action: &GameAction) -> Vec<Coin> {
        match action {
            GameAction::Guess { .. } => vec![Coin::new(self.guess_fee, self.denom.clone())],
            GameAction::AddFundsToPool { amount } => vec![Coin::new(*amount, self.denom.clone())],
            GameAction::ClaimPrize { .. } | GameAction::CollectUnclaimedPool { .. } => Vec::new(),
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            denom: Self::DEFAULT_DENOM.to_string(),
            guess_fee: Self::DEFAULT_GUESS_FEE,
            tx_fee: Self::DEFAULT_TX_FEE,
            gas_limit: Self::DEFAULT_GAS_LIMIT,
        }
    }
}

/// A fully specified contract execution, ready to be signed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteRequest {
    pub sender: Address,
    pub contract: Address,
    pub msg: serde_json::Value,
    pub funds: Vec<Coin>,
    pub fee: Fee,
    pub memo: String,
}

impl ExecuteRequest {
    /// Request for `action` with the schedule's funds, fee and memo.
    pub fn for_action(
        contract: &Address,
        sender: &Address,
        fees: &FeeSchedule,
        action: &GameAction,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            sender: sender.clone(),
            contract: contract.clone(),
            msg: serde_json::to_value(action.to_msg())?,
            funds: fees.funds_for(action),
            fee: fees.fee(),
            memo: action.memo().to_string(),
        })
    }
}

/// An account exposed by the wallet for the enabled chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
}

impl Account {
    pub fn new(address: impl Into<Address>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Push notification from the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystoreEvent {
    /// The user switched accounts or the key store was modified.
    Changed,
}

// ============================================================================
// Wallet chain suggestion
// ============================================================================

/// Chain description handed to the wallet before enabling it.
///
/// Field names follow the wallet's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc: String,
    pub rest: String,
    pub stake_currency: Currency,
    pub bip44: Bip44,
    pub bech32_config: Bech32Config,
    pub currencies: Vec<Currency>,
    pub fee_currencies: Vec<FeeCurrency>,
    pub features: Vec<String>,
}

impl ChainInfo {
    /// Payload for a CosmWasm-enabled chain paying fees in its staking coin.
    pub fn cosmwasm(
        chain_id: impl Into<String>,
        chain_name: impl Into<String>,
        rpc: impl Into<String>,
        rest: impl Into<String>,
        currency: Currency,
        bech32_prefix: &str,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            chain_name: chain_name.into(),
            rpc: rpc.into(),
            rest: rest.into(),
            stake_currency: currency.clone(),
            bip44: Bip44::default(),
            bech32_config: Bech32Config::from_account_prefix(bech32_prefix),
            currencies: vec![currency.clone()],
            fee_currencies: vec![FeeCurrency {
                currency,
                gas_price_step: GasPriceStep::default(),
            }],
            features: vec!["cosmwasm".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub coin_denom: String,
    pub coin_minimal_denom: String,
    pub coin_decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCurrency {
    #[serde(flatten)]
    pub currency: Currency,
    pub gas_price_step: GasPriceStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPriceStep {
    pub low: u64,
    pub average: u64,
    pub high: u64,
}

impl Default for GasPriceStep {
    fn default() -> Self {
        Self {
            low: 30_000,
            average: 40_000,
            high: 50_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    pub coin_type: u32,
}

impl Default for Bip44 {
    fn default() -> Self {
        Self { coin_type: 118 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bech32Config {
    pub bech32_prefix_acc_addr: String,
    pub bech32_prefix_acc_pub: String,
    pub bech32_prefix_val_addr: String,
    pub bech32_prefix_val_pub: String,
    pub bech32_prefix_cons_addr: String,
    pub bech32_prefix_cons_pub: String,
}

impl Bech32Config {
    /// Standard Cosmos SDK prefix family derived from the account prefix.
    pub fn from_account_prefix(prefix: &str) -> Self {
        Self {
            bech32_prefix_acc_addr: prefix.to_string(),
            bech32_prefix_acc_pub: format!("{prefix}pub"),
            bech32_prefix_val_addr: format!("{prefix}valoper"),
            bech32_prefix_val_pub: format!("{prefix}valoperpub"),
            bech32_prefix_cons_addr: format!("{prefix}valcons"),
            bech32_prefix_cons_pub: format!("{prefix}valconspub"),
        }
    }
}

/// Chain-specific configuration.
///
/// This is a trait to allow different chains to provide their own config types.
pub trait BlockchainConfig: Send + Sync {
    /// Human-readable network name (e.g., "testnet", "mainnet")
    fn network_name(&self) -> &str;

    /// RPC endpoint URL
    fn rpc_url(&self) -> &str;

    /// Validate configuration (e.g., URL schemes, address prefix)
    fn validate(&self) -> Result<(), String>;
}

//! Client configuration structures and loaders.
use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use client_blockchain_core::FeeSchedule;
use client_blockchain_cosmwasm::CosmWasmConfig;
use runtime::RuntimeConfig;

/// Configuration required to bootstrap a game client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub chain: CosmWasmConfig,
    pub fees: FeeSchedule,
    pub runtime: RuntimeConfig,
    /// Timeout applied to every REST request.
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let chain = CosmWasmConfig::default();
        let fees = FeeSchedule {
            denom: chain.denom.clone(),
            ..FeeSchedule::default()
        };
        Self {
            chain,
            fees,
            runtime: RuntimeConfig::default(),
            http_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Chain variables are documented on [`CosmWasmConfig::from_env`]. In
    /// addition:
    /// - `REFRESH_INTERVAL_MS` - Game state poll period (default: 5000)
    /// - `WALLET_POLL_INTERVAL_MS` - Wallet account check period (default: 3000)
    /// - `EVENT_BUFFER_SIZE` - Capacity of each event topic (default: 100)
    /// - `GUESS_FEE` - Funds attached to a guess, micro units (default: 15000000000)
    /// - `TX_FEE` - Transaction fee, micro units (default: 10000000)
    /// - `GAS_LIMIT` - Gas limit per execute (default: 200000)
    /// - `HTTP_TIMEOUT_SECS` - REST request timeout (default: 15)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain = CosmWasmConfig::from_lookup(&lookup).context("Failed to load chain configuration")?;
        let mut config = Self {
            fees: FeeSchedule {
                denom: chain.denom.clone(),
                ..FeeSchedule::default()
            },
            chain,
            ..Self::default()
        };

        if let Some(ms) = read_env::<u64, _>(&lookup, "REFRESH_INTERVAL_MS")? {
            config.runtime.refresh_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64, _>(&lookup, "WALLET_POLL_INTERVAL_MS")? {
            config.runtime.wallet_poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(capacity) = read_env::<usize, _>(&lookup, "EVENT_BUFFER_SIZE")? {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        if let Some(fee) = read_env(&lookup, "GUESS_FEE")? {
            config.fees.guess_fee = fee;
        }
        if let Some(fee) = read_env(&lookup, "TX_FEE")? {
            config.fees.tx_fee = fee;
        }
        if let Some(gas) = read_env(&lookup, "GAS_LIMIT")? {
            config.fees.gas_limit = gas;
        }

        if let Some(secs) = read_env::<u64, _>(&lookup, "HTTP_TIMEOUT_SECS")? {
            config.http_timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }
}

/// Parse `key` when it is set; a set but unparsable value is an error.
fn read_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("Invalid {key}={raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use game_core::Amount;

    use super::*;

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_match_reference_intervals_and_fees() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.runtime.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.runtime.wallet_poll_interval, Duration::from_secs(3));
        assert_eq!(config.fees.guess_fee, Amount::new(15_000_000_000));
        assert_eq!(config.fees.denom, "nshr");
    }

    #[test]
    fn overrides_intervals_fees_and_denom() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("REFRESH_INTERVAL_MS", "1500"),
            ("WALLET_POLL_INTERVAL_MS", "0"),
            ("GUESS_FEE", "42"),
            ("GAME_DENOM", "ucosm"),
        ]))
        .unwrap();
        assert_eq!(config.runtime.refresh_interval, Duration::from_millis(1500));
        assert_eq!(config.runtime.wallet_poll_interval, Duration::from_millis(1));
        assert_eq!(config.fees.guess_fee, Amount::new(42));
        assert_eq!(config.fees.denom, "ucosm");
    }

    #[test]
    fn unparsable_values_are_errors() {
        let err = ClientConfig::from_lookup(lookup(&[("GAS_LIMIT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("GAS_LIMIT"));

        let err = ClientConfig::from_lookup(lookup(&[("GAME_NETWORK", "moon")])).unwrap_err();
        assert!(format!("{err:#}").contains("GAME_NETWORK"));
    }
}

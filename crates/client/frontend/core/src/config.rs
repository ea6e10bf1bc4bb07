//! Frontend configuration structures and loaders.
//!
//! This module contains UI-specific configuration that is shared across
//! different frontend implementations.

use std::env;

/// Frontend-specific configuration.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub messages: MessageConfig,
}

impl FrontendConfig {
    pub const fn new(messages: MessageConfig) -> Self {
        Self { messages }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STATUS_LOG_CAPACITY` - Status lines kept in the message log (default: 64)
    /// - `SHOW_REFRESH_MESSAGES` - Keep "Game state refreshed" lines (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize, _>(&lookup, "STATUS_LOG_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }
        if let Some(show) = read_env_bool(&lookup, "SHOW_REFRESH_MESSAGES") {
            config.messages.show_refresh = show;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
    /// The reconciler reports every successful poll; most UIs hide those.
    pub show_refresh: bool,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            show_refresh: false,
        }
    }
}

fn read_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)?.trim().parse().ok()
}

fn read_env_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key)?.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_read_and_clamped() {
        let config = FrontendConfig::from_lookup(|key| match key {
            "STATUS_LOG_CAPACITY" => Some("0".to_string()),
            "SHOW_REFRESH_MESSAGES" => Some("yes".to_string()),
            _ => None,
        });
        assert_eq!(config.messages.capacity, 1);
        assert!(config.messages.show_refresh);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let config = FrontendConfig::from_lookup(|_| Some("many".to_string()));
        assert_eq!(config.messages.capacity, 64);
        assert!(!config.messages.show_refresh);
    }
}

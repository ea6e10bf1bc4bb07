//! Proxy configuration structures and loaders.
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Errors raised while reading proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where to listen and which RPC node to forward to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyConfig {
    pub listen_addr: SocketAddr,
    /// Upstream origin without a trailing slash, `http` or `https`.
    pub upstream: String,
    /// Path prefix served by the proxy, stripped before forwarding.
    pub path_prefix: String,
    /// Largest request body forwarded upstream, in bytes.
    pub body_limit: usize,
    pub upstream_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            upstream: "https://rpc-testnet.shareri.ng".to_string(),
            path_prefix: "/rpc".to_string(),
            body_limit: 2 * 1024 * 1024,
            upstream_timeout: Duration::from_secs(30),
        }
    }
}

impl ProxyConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PROXY_LISTEN_ADDR` - Socket address to bind (default: 127.0.0.1:3001)
    /// - `PROXY_UPSTREAM` - RPC node origin (default: https://rpc-testnet.shareri.ng)
    /// - `PROXY_PATH_PREFIX` - Served path prefix (default: /rpc)
    /// - `PROXY_BODY_LIMIT` - Max request body in bytes (default: 2097152)
    /// - `PROXY_TIMEOUT_SECS` - Upstream request timeout (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = read_env(&lookup, "PROXY_LISTEN_ADDR")? {
            config.listen_addr = addr;
        }
        if let Some(upstream) = read_raw(&lookup, "PROXY_UPSTREAM") {
            config.upstream = normalize_upstream(&upstream)?;
        }
        if let Some(prefix) = read_raw(&lookup, "PROXY_PATH_PREFIX") {
            config.path_prefix = normalize_prefix(&prefix);
        }
        if let Some(limit) = read_env::<usize, _>(&lookup, "PROXY_BODY_LIMIT")? {
            config.body_limit = limit;
        }
        if let Some(secs) = read_env::<u64, _>(&lookup, "PROXY_TIMEOUT_SECS")? {
            config.upstream_timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }

    /// Upstream URL for a forwarded path (which starts with `/`).
    pub fn http_target(&self, path_and_query: &str) -> String {
        format!("{}{}", self.upstream, path_and_query)
    }

    /// WebSocket URL for a forwarded path: `http` becomes `ws`, `https` `wss`.
    pub fn ws_target(&self, path_and_query: &str) -> String {
        let origin = match self.upstream.strip_prefix("https://") {
            Some(rest) => format!("wss://{rest}"),
            None => match self.upstream.strip_prefix("http://") {
                Some(rest) => format!("ws://{rest}"),
                None => self.upstream.clone(),
            },
        };
        format!("{origin}{path_and_query}")
    }

    /// Path left after removing the prefix, or `None` when the request is not
    /// under it. `/rpc` and `/rpc/` both map to `/`.
    pub fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.path_prefix == "/" {
            return Some(path);
        }
        let rest = path.strip_prefix(self.path_prefix.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

fn normalize_upstream(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let valid_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.split("://").nth(1).is_some_and(|host| !host.is_empty());
    if !valid_scheme || !has_host {
        return Err(ConfigError::InvalidValue {
            key: "PROXY_UPSTREAM",
            value: value.to_string(),
            reason: "expected an http:// or https:// origin".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn normalize_prefix(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    format!("/{trimmed}")
}

fn read_raw<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` when it is set; a set but unparsable value is an error.
fn read_env<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = read_raw(lookup, key) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

//! Tracing subscriber setup for the terminal client.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "client.log";

/// Platform-specific log directory, overridable with `LOG_DIR`.
///
/// - macOS: `~/Library/Application Support/guessing-game/logs`
/// - Linux: `~/.local/share/guessing-game/logs` (or `$XDG_DATA_HOME/...`)
/// - Windows: `%APPDATA%\guessing-game\logs`
/// - Fallback: `/tmp/guessing-game/logs`
pub fn log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("LOG_DIR").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "guessing-game")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/guessing-game"))
        .join("logs")
}

/// Install a subscriber writing to stderr and to a daily rolling file.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Keep the returned
/// guard alive for the lifetime of the process or buffered lines are lost.
pub fn setup_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Log directory: {}", log_dir.display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_the_log_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested").join("logs");
        let _guard = setup_logging(&dir).unwrap();
        assert!(dir.is_dir());

        // A second subscriber cannot be installed in the same process
        assert!(setup_logging(&dir).is_err());
    }
}

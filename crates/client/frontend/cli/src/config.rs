//! CLI-specific configuration for terminal output.
use std::env;

/// CLI terminal configuration.
///
/// This contains settings specific to the terminal interface,
/// separate from cross-frontend client configuration.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub ui: UiConfig,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLI_BOARD_COLUMNS` - Numbers per row of the board (default: 10)
    /// - `CLI_MESSAGE_LINES` - Status lines printed by `status` (default: 10)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(columns) = read_env::<usize>("CLI_BOARD_COLUMNS") {
            config.ui.board_columns = columns.max(1);
        }
        if let Some(lines) = read_env::<usize>("CLI_MESSAGE_LINES") {
            config.ui.message_lines = lines;
        }

        config
    }
}

/// Layout of the rendered output.
#[derive(Clone, Debug)]
pub struct UiConfig {
    pub board_columns: usize,
    pub message_lines: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            board_columns: 10,
            message_lines: 10,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

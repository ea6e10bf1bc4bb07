//! Command line surface of the terminal client.
use clap::{Parser, Subcommand};

/// Play the on-chain guessing game from a terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "guessing-game")]
#[command(about = "Terminal client for the ShareRing guessing game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Wallet address to act as (overrides GAME_WALLET_ADDRESS)
    #[arg(long, global = true, value_name = "ADDRESS")]
    pub address: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current round, pool and number board
    Status,

    /// Keep polling and print every refresh until interrupted
    Watch {
        /// Stop after this many refreshes
        #[arg(long, value_name = "N")]
        updates: Option<u64>,
    },

    /// Show the all-time leaderboard
    Leaderboard,

    /// Submit a guess for the current round
    Guess {
        #[arg(value_name = "NUMBER")]
        number: String,
    },

    /// Claim the prize of a finished round
    Claim {
        #[arg(value_name = "ROUND")]
        round: String,
    },

    /// Add funds to the prize pool (admin only), in micro units
    AddFunds {
        #[arg(value_name = "AMOUNT")]
        amount: String,
    },

    /// Collect the unclaimed pool of a finished round (admin only)
    Collect {
        #[arg(value_name = "ROUND")]
        round: String,
    },
}

impl Command {
    /// Commands that sign a transaction.
    pub fn is_transaction(&self) -> bool {
        matches!(
            self,
            Command::Guess { .. }
                | Command::Claim { .. }
                | Command::AddFunds { .. }
                | Command::Collect { .. }
        )
    }

    /// Commands that need a wallet session to run.
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::Leaderboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_address_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "guessing-game",
            "guess",
            "42",
            "--address",
            "shareledger1me",
        ])
        .unwrap();
        assert_eq!(cli.address.as_deref(), Some("shareledger1me"));
        assert_eq!(
            cli.command,
            Command::Guess {
                number: "42".to_string()
            }
        );
        assert!(cli.command.is_transaction());
    }

    #[test]
    fn kebab_case_subcommands() {
        let cli = Cli::try_parse_from(["guessing-game", "add-funds", "1000"]).unwrap();
        assert!(matches!(cli.command, Command::AddFunds { .. }));

        let cli = Cli::try_parse_from(["guessing-game", "watch", "--updates", "3"]).unwrap();
        assert_eq!(cli.command, Command::Watch { updates: Some(3) });

        let cli = Cli::try_parse_from(["guessing-game", "leaderboard"]).unwrap();
        assert!(!cli.command.needs_session());
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        assert!(Cli::try_parse_from(["guessing-game", "claim"]).is_err());
    }
}

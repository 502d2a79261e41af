//! Command-line interface definitions.
//!
//! Defines the CLI structure for wagerline using `clap`: reading bets,
//! the three ledger writes, price previews, and configuration management.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::paths;
use crate::domain::{BetId, Side};

/// Threshold wagers resolved by a price oracle
#[derive(Parser, Debug)]
#[command(name = "wagerline")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Skip confirmation prompts before moving funds
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the wagerline CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every bet on the ledger
    List,

    /// Create a new bet
    Create(CreateArgs),

    /// Stake on one side of an open bet
    Stake(StakeArgs),

    /// End a bet's epoch with fresh oracle evidence
    EndEpoch(EndEpochArgs),

    /// Show the latest oracle prices for the resolution feeds
    Price,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `wagerline config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

/// Arguments for `wagerline create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Human-readable claim, e.g. "ETH > 5000"
    #[arg(long)]
    pub title: String,

    /// Numeric threshold the metric is compared against
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: String,
}

/// Pool a stake is placed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    /// The metric will exceed the threshold
    Exceed,
    /// The metric will not exceed the threshold
    NotExceed,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Exceed => Self::Exceed,
            SideArg::NotExceed => Self::NotExceed,
        }
    }
}

/// Arguments for `wagerline stake`.
#[derive(Args, Debug)]
pub struct StakeArgs {
    /// Bet id
    pub bet_id: u64,

    /// Side to stake on
    #[arg(long, value_enum)]
    pub side: SideArg,

    /// Amount in native units, e.g. 0.5
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,
}

impl StakeArgs {
    #[must_use]
    pub const fn bet_id(&self) -> BetId {
        BetId::new(self.bet_id)
    }
}

/// Arguments for `wagerline end-epoch`.
#[derive(Args, Debug)]
pub struct EndEpochArgs {
    /// Bet id
    pub bet_id: u64,
}

/// Arguments for `wagerline config init`.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_command() {
        let cli = Cli::try_parse_from(["wagerline", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert!(!cli.json);
        assert!(cli.config.ends_with("config.toml"));
    }

    #[test]
    fn test_create_command() {
        let cli = Cli::try_parse_from([
            "wagerline",
            "create",
            "--title",
            "ETH > 5000",
            "--threshold",
            "5000",
        ])
        .unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("Expected Create command");
        };
        assert_eq!(args.title, "ETH > 5000");
        assert_eq!(args.threshold, "5000");
    }

    #[test]
    fn test_stake_command() {
        let cli = Cli::try_parse_from([
            "wagerline",
            "stake",
            "3",
            "--side",
            "not-exceed",
            "--amount",
            "0.5",
            "--yes",
        ])
        .unwrap();
        assert!(cli.yes);
        let Commands::Stake(args) = cli.command else {
            panic!("Expected Stake command");
        };
        assert_eq!(args.bet_id(), BetId::new(3));
        assert_eq!(Side::from(args.side), Side::NotExceed);
        assert_eq!(args.amount, "0.5");
    }

    #[test]
    fn test_stake_rejects_unknown_side() {
        let result = Cli::try_parse_from([
            "wagerline", "stake", "3", "--side", "maybe", "--amount", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let cli = Cli::try_parse_from([
            "wagerline", "stake", "1", "--side", "exceed", "--amount", "-1",
        ])
        .unwrap();
        let Commands::Stake(args) = cli.command else {
            panic!("Expected Stake command");
        };
        assert_eq!(args.amount, "-1");
    }

    #[test]
    fn test_end_epoch_command() {
        let cli = Cli::try_parse_from(["wagerline", "end-epoch", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::EndEpoch(EndEpochArgs { bet_id: 7 })
        ));
    }

    #[test]
    fn test_config_commands() {
        let cli = Cli::try_parse_from(["wagerline", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Init(ConfigInitArgs { force: true }))
        ));
        let cli = Cli::try_parse_from(["wagerline", "--config", "/tmp/w.toml", "config", "show"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/w.toml"));
        assert!(matches!(cli.command, Commands::Config(ConfigCommand::Show)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["wagerline", "price", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}

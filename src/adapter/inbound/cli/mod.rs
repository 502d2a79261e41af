//! CLI module graph and command dispatch.

pub mod bet;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod output;
pub mod paths;
pub mod price;
pub mod progress;

use tracing::debug;

use self::command::{Cli, Commands, ConfigCommand};
use self::output::OutputConfig;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Log level implied by `--quiet` and repeated `-v`, if any.
fn level_override(quiet: bool, verbose: u8) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    }
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns the first error raised by the command.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Commands::Config(command) = &cli.command {
        return match command {
            ConfigCommand::Init(args) => config::execute_init(&cli.config, args.force),
            ConfigCommand::Show => config::execute_show(&cli.config),
            ConfigCommand::Validate => config::execute_validate(&cli.config),
        };
    }

    let config = Config::load(&cli.config)?;
    match level_override(cli.quiet, cli.verbose) {
        Some(level) => config.logging.with_level(level).init(),
        None => config.init_logging(),
    }
    debug!(path = %cli.config.display(), ledger = %config.ledger.kind, "Config loaded");

    match &cli.command {
        Commands::List => bet::execute_list(&config).await,
        Commands::Create(args) => bet::execute_create(&config, args).await,
        Commands::Stake(args) => bet::execute_stake(&config, args, cli.yes).await,
        Commands::EndEpoch(args) => bet::execute_end_epoch(&config, args, cli.yes).await,
        Commands::Price => price::execute_price(&config).await,
        Commands::Config(_) => Ok(()),
    }
}

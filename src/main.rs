use clap::Parser;

use wagerline::adapter::inbound::cli::{self, command::Cli, diagnostic};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config_path = cli.config.clone();
    cli::run(cli)
        .await
        .map_err(|e| diagnostic::diagnose(e, &config_path))
}

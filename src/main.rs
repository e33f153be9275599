//! Agentdeck CLI entry point.

use anyhow::Result;
use clap::Parser;

use agentdeck::cli::{self, Cli};
use agentdeck::infrastructure::config::ConfigLoader;
use agentdeck::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        cli::handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    cli::commands::dispatch(cli.command, &config, cli.json).await
}

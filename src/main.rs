//! Marketflow CLI application.

mod cli;
mod feed;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Setup logging with the given level.
pub(crate) fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            cli::commands::run::run(args, &cli.config, cli.log_level.as_deref(), cli.json_logs)
                .await
        }
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}

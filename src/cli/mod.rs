//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marketflow")]
#[command(author, version, about = "Streaming indicator engine with multi-asset dispatch")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level override (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a CSV bar feed through the dispatch core
    Run(RunArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Bar feed file (CSV: symbol,time,open,high,low,close)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Use trace-only traders instead of live ones
    #[arg(long)]
    pub dry_run: bool,
}

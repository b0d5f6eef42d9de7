//! Desole CLI - Command-line interface for the Desole error agent
//!
//! Provides commands for:
//! - Sending a one-off report to the configured collector
//! - Checking text against the noise filter
//! - Viewing and validating configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use desole_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{check::CheckCommand, config::ConfigCommand, send::SendCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "desole", version, about = "Client-side error reporting agent")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send one report to the collector
    Send(SendCommand),
    /// Check whether text would be suppressed as noise
    Check(CheckCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Send(cmd) => cmd.execute(&config_path, format).await,
        Commands::Check(cmd) => cmd.execute(format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}

//! zedthreads-mcp: MCP server for browsing Zed's chat thread archive.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use zedthreads_server::{config::Config, logging, protocol::McpServer, state::AppState};

use logging::{LogConfig, LogFormat};

/// MCP server exposing Zed chat threads as tools over stdio.
#[derive(Parser, Debug)]
#[command(name = "zedthreads-mcp")]
#[command(about = "Model Context Protocol server for Zed chat threads")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the threads database path from config
    #[arg(long, value_name = "FILE")]
    db_path: Option<PathBuf>,

    /// Enable verbose logging (INFO level for most targets)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging (DEBUG level)
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (TRACE level for everything)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "tools=debug").
    /// Can be specified multiple times. Targets are prefixed with "zedthreads::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }

    tracing::info!(
        target: "zedthreads::startup",
        "Opening threads database at {}",
        config.db_path.display()
    );

    let state = Arc::new(AppState::new(config)?);
    tracing::info!(target: "zedthreads::startup", "Initialized application state");

    let server = McpServer::new(state);
    server.run().await
}

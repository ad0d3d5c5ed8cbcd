//! # Tracklist
//!
//! Binary entry point.

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use tracklist_cli::commands::run_export;
use tracklist_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Tracklist starting");

    let result = run_export(&cli).await;

    if let Err(ref e) = result {
        tracing::error!(error = format!("{e:#}"), "Export failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let config = ObservabilityConfig {
        log_format: cli.log_format.into(),
        ..Default::default()
    }
    .with_verbosity(cli.verbose, cli.quiet);

    observability::init_logging(&config)
}

//! spreadwatch - cross-exchange candidate scanner and spread monitor.
//!
//! - `scan`: rebuild the Candidate Store now and every scan interval
//! - `spread`: poll spreads for the stored candidates
//! - `run`: both in one process

use anyhow::Result;
use clap::{Parser, Subcommand};
use spreadwatch_bot::config::CONFIG_PATH_ENV;
use spreadwatch_bot::{AppConfig, Application};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Binance/Bybit perpetual spread monitor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SPREADS_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover common high-volume perpetuals
    Scan {
        /// Scan once and exit
        #[arg(long)]
        once: bool,
    },
    /// Monitor spreads of the stored candidates
    Spread {
        /// Run one cycle and exit
        #[arg(long)]
        once: bool,
    },
    /// Run the scanner and the spread loop together
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    spreadwatch_telemetry::init_logging()?;

    info!("Starting spreadwatch v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "Failed to load .env");
        }
    }

    let config_path = args
        .config
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
    info!(config_path = ?config_path, "Loading configuration");

    let config = AppConfig::load(config_path.as_deref())?;
    info!(
        out = %config.results_path.display(),
        candidates = %config.candidates_path.display(),
        interval_secs = config.poll_interval_secs,
        min_bps = ?config.min_bps,
        max_bps = ?config.max_bps,
        "Configuration loaded"
    );

    let app = Application::new(config)?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    match args.command {
        Command::Scan { once: true } => app.scan_once().await?,
        Command::Scan { once: false } => app.run_scanner(cancel).await?,
        Command::Spread { once: true } => {
            let summary = app.spread_once().await?;
            info!(%summary, "Spread cycle finished");
        }
        Command::Spread { once: false } => app.run_spread_loop(cancel).await?,
        Command::Run => app.run_all(cancel).await?,
    }

    info!("Stopped");
    Ok(())
}

//! Application wiring.
//!
//! Builds the shared exchange client and the two periodic units from
//! [`AppConfig`]:
//! - scan: [`ScanJob`] driven by the [`Scheduler`]
//! - spread: [`SpreadLoop`] sleeping `poll_interval_secs` between cycles

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::jobs::ScanJob;
use crate::scheduler::{Job, Scheduler};
use crate::spread_loop::SpreadLoop;
use spreadwatch_detector::{CycleSummary, SpreadEngine};
use spreadwatch_persistence::{CandidateStore, ResultsStore, SignalJournal};
use spreadwatch_registry::ExchangeClient;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Main application.
pub struct Application {
    config: AppConfig,
    client: ExchangeClient,
}

impl Application {
    /// Create a new application. The configuration is validated first.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let client = ExchangeClient::new(config.client_config()?)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scan job over the live exchange client.
    pub fn scan_job(&self) -> ScanJob<ExchangeClient> {
        ScanJob::new(
            self.client.clone(),
            CandidateStore::new(&self.config.candidates_path),
            self.config.min_volume_usd,
        )
    }

    /// Spread loop over the live exchange client.
    pub fn spread_loop(&self) -> AppResult<SpreadLoop<ExchangeClient>> {
        let engine = SpreadEngine::new(self.client.clone())
            .with_max_in_flight(self.config.max_in_flight)
            .with_top_n(self.config.top_n);

        let mut spread_loop = SpreadLoop::new(
            engine,
            CandidateStore::new(&self.config.candidates_path),
            ResultsStore::new(&self.config.results_path),
            self.config.thresholds(),
            self.config.poll_interval()?,
        );

        if let Some(dir) = &self.config.journal_dir {
            let journal = SignalJournal::new(dir)?;
            info!(dir = %journal.base_dir().display(), "Signal journal enabled");
            spread_loop = spread_loop.with_journal(journal);
        }

        Ok(spread_loop)
    }

    /// Run one scan and replace the Candidate Store.
    pub async fn scan_once(&self) -> AppResult<()> {
        self.scan_job().run().await
    }

    /// Run one spread cycle and replace the Results Store.
    pub async fn spread_once(&self) -> AppResult<CycleSummary> {
        self.spread_loop()?.run_cycle().await
    }

    /// Scheduler running the scan job immediately, then every scan interval.
    pub fn scanner_scheduler(&self) -> AppResult<Scheduler> {
        let mut scheduler = Scheduler::new();
        scheduler.add_job(self.scan_job(), self.config.scan_interval()?, true);
        Ok(scheduler)
    }

    /// Run the periodic scanner until cancelled.
    pub async fn run_scanner(&self, cancel: CancellationToken) -> AppResult<()> {
        self.scanner_scheduler()?.run(cancel).await;
        Ok(())
    }

    /// Run the spread loop until cancelled.
    pub async fn run_spread_loop(&self, cancel: CancellationToken) -> AppResult<()> {
        self.spread_loop()?.run(cancel).await;
        Ok(())
    }

    /// Run the scanner and the spread loop as independent tasks.
    pub async fn run_all(&self, cancel: CancellationToken) -> AppResult<()> {
        let scheduler = self.scanner_scheduler()?;
        let spread_loop = self.spread_loop()?;

        let scan_handle = tokio::spawn(scheduler.run(cancel.clone()));
        let spread_handle = tokio::spawn(spread_loop.run(cancel));

        let (scan, spread) = tokio::join!(scan_handle, spread_handle);
        scan.map_err(|e| AppError::Task(format!("scanner: {e}")))?;
        spread.map_err(|e| AppError::Task(format!("spread loop: {e}")))?;
        Ok(())
    }
}

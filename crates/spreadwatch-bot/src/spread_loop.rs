//! Spread polling loop.
//!
//! ```text
//! Idle -> FetchingCandidates -> Computing -> WritingResults -> Sleeping -> Idle
//! ```
//!
//! The Results Store is written once per cycle from the complete in-memory
//! result list. Cancellation during `Computing` drops the batch before any
//! write; cancellation during `Sleeping` exits at once.

use crate::error::AppResult;
use chrono::Utc;
use spreadwatch_core::MarketCandidate;
use spreadwatch_detector::{CycleOutcome, CycleSummary, SpreadEngine, SpreadThresholds};
use spreadwatch_persistence::{CandidateStore, ResultsStore, SignalJournal};
use spreadwatch_registry::QuoteSource;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Spread loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadPhase {
    Idle,
    FetchingCandidates,
    Computing,
    WritingResults,
    Sleeping,
}

/// Periodic spread monitor.
pub struct SpreadLoop<Q> {
    engine: SpreadEngine<Q>,
    candidates: CandidateStore,
    results: ResultsStore,
    thresholds: SpreadThresholds,
    interval: Duration,
    journal: Option<SignalJournal>,
    phase: SpreadPhase,
}

impl<Q: QuoteSource> SpreadLoop<Q> {
    pub fn new(
        engine: SpreadEngine<Q>,
        candidates: CandidateStore,
        results: ResultsStore,
        thresholds: SpreadThresholds,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            candidates,
            results,
            thresholds,
            interval,
            journal: None,
            phase: SpreadPhase::Idle,
        }
    }

    /// Also append every included sample to `journal`.
    pub fn with_journal(mut self, journal: SignalJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn phase(&self) -> SpreadPhase {
        self.phase
    }

    fn enter(&mut self, phase: SpreadPhase) {
        debug!(from = ?self.phase, to = ?phase, "Spread loop phase");
        self.phase = phase;
    }

    /// Current candidates; an unreadable store counts as empty.
    fn load_candidates(&self) -> Vec<MarketCandidate> {
        match self.candidates.load() {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.candidates.path().display(),
                    "Candidate store unreadable, using zero candidates"
                );
                Vec::new()
            }
        }
    }

    /// Run a single cycle without sleeping.
    pub async fn run_cycle(&mut self) -> AppResult<CycleSummary> {
        self.enter(SpreadPhase::FetchingCandidates);
        let candidates = self.load_candidates();

        self.enter(SpreadPhase::Computing);
        let outcome = self.engine.run_cycle(&candidates, &self.thresholds).await;

        let summary = self.publish(outcome);
        self.enter(SpreadPhase::Idle);
        summary
    }

    /// Run until `cancel` fires.
    ///
    /// Errors writing the Results Store are logged and the loop continues.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            interval = ?self.interval,
            out = %self.results.path().display(),
            min_bps = ?self.thresholds.min_bps,
            max_bps = ?self.thresholds.max_bps,
            "Spread loop starting"
        );

        loop {
            info!(run_at = %Utc::now().format("%Y-%m-%d %H:%M:%S"), "Spread cycle");

            self.enter(SpreadPhase::FetchingCandidates);
            let candidates = self.load_candidates();

            self.enter(SpreadPhase::Computing);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Spread loop stopped, in-flight batch dropped");
                    return;
                }
                outcome = self.engine.run_cycle(&candidates, &self.thresholds) => outcome,
            };

            if let Err(e) = self.publish(outcome) {
                error!(error = %e, "Failed to write results");
            }

            self.enter(SpreadPhase::Sleeping);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Spread loop stopped");
                    return;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
            self.enter(SpreadPhase::Idle);
        }
    }

    /// Write the Results Store (and journal), then log the summary.
    fn publish(&mut self, outcome: CycleOutcome) -> AppResult<CycleSummary> {
        self.enter(SpreadPhase::WritingResults);
        self.results.replace(&outcome.included)?;

        if let Some(journal) = self.journal.as_mut() {
            if let Err(e) = journal.append(&outcome.included) {
                warn!(error = %e, "Failed to journal signals");
            }
        }

        info!(
            saved = outcome.included.len(),
            summary = %outcome.summary,
            "Spread cycle complete"
        );
        Ok(outcome.summary)
    }
}

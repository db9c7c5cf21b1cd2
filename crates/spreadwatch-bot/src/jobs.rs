//! Scheduled jobs.

use crate::error::AppResult;
use crate::scheduler::Job;
use async_trait::async_trait;
use spreadwatch_persistence::CandidateStore;
use spreadwatch_registry::{MarketScanner, UniverseSource};
use tracing::info;

/// Rescans both exchanges and replaces the Candidate Store.
///
/// On failure the store keeps its previous contents.
pub struct ScanJob<S> {
    scanner: MarketScanner<S>,
    store: CandidateStore,
    min_volume_usd: f64,
}

impl<S: UniverseSource> ScanJob<S> {
    pub fn new(source: S, store: CandidateStore, min_volume_usd: f64) -> Self {
        Self {
            scanner: MarketScanner::new(source),
            store,
            min_volume_usd,
        }
    }
}

#[async_trait]
impl<S: UniverseSource> Job for ScanJob<S> {
    fn name(&self) -> &str {
        "market_scan"
    }

    async fn run(&self) -> AppResult<()> {
        let candidates = self
            .scanner
            .find_common_high_volume_futures(self.min_volume_usd)
            .await?;

        self.store.replace(&candidates)?;

        info!(
            count = candidates.len(),
            path = %self.store.path().display(),
            "Candidate store replaced"
        );
        Ok(())
    }
}

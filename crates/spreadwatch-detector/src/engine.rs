//! Spread engine.
//!
//! One cycle:
//! 1. Skip candidates missing a raw symbol for either exchange
//! 2. Fetch both top-of-books per candidate (fail-soft, concurrent)
//! 3. Compute mids, `spread_abs`, `spread_bps`
//! 4. Keep samples inside the threshold band, rounding `spread_bps`
//! 5. Emit one signal per kept sample

use crate::config::SpreadThresholds;
use crate::report::{CycleSummary, DEFAULT_TOP_N};
use crate::signal::{SignalSink, TerminalBell};
use futures_util::stream::{self, StreamExt};
use futures_util::FutureExt;
use spreadwatch_core::{ExchangeId, MarketCandidate, SpreadSample};
use spreadwatch_registry::QuoteSource;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default number of candidates fetched concurrently.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Samples kept by one cycle plus its summary.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// In-band samples with rounded `spread_bps`, in candidate order.
    pub included: Vec<SpreadSample>,
    pub summary: CycleSummary,
}

/// Spread engine over a [`QuoteSource`].
pub struct SpreadEngine<Q> {
    source: Q,
    sink: Arc<dyn SignalSink>,
    max_in_flight: usize,
    top_n: usize,
}

impl<Q: QuoteSource> SpreadEngine<Q> {
    /// Create an engine signaling through [`TerminalBell`].
    pub fn new(source: Q) -> Self {
        Self {
            source,
            sink: Arc::new(TerminalBell),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Replace the signal sink.
    pub fn with_sink(mut self, sink: Arc<dyn SignalSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Bound on concurrently evaluated candidates (minimum 1).
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Size of the ranked summary.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Sample one candidate. Both exchanges are queried concurrently.
    pub async fn sample(&self, candidate: &MarketCandidate) -> SpreadSample {
        let (quote_a, quote_b) = tokio::join!(
            self.source
                .top_of_book(ExchangeId::A, candidate.raw_symbol(ExchangeId::A)),
            self.source
                .top_of_book(ExchangeId::B, candidate.raw_symbol(ExchangeId::B))
        );

        let sample = SpreadSample::from_quotes(candidate.base(), quote_a, quote_b);
        trace!(
            symbol = %sample.symbol,
            mid_a = ?sample.mid_a,
            mid_b = ?sample.mid_b,
            spread_bps = ?sample.spread_bps,
            "Sampled"
        );
        sample
    }

    /// Sample every usable candidate, preserving candidate order.
    ///
    /// Candidates with an empty raw symbol are skipped. A failed quote only
    /// affects its own sample.
    pub async fn evaluate_all(&self, candidates: &[MarketCandidate]) -> Vec<SpreadSample> {
        let usable: Vec<&MarketCandidate> = candidates
            .iter()
            .filter(|c| {
                let ok = c.has_raw_symbols();
                if !ok {
                    debug!(symbol = %c.symbol, "Skipping candidate without raw symbols");
                }
                ok
            })
            .collect();

        // Unboxed, this future is not provably `Send` inside spawned tasks.
        stream::iter(usable)
            .map(|candidate| self.sample(candidate))
            .buffered(self.max_in_flight)
            .collect::<Vec<_>>()
            .boxed()
            .await
    }

    /// Apply the threshold band, emitting a signal for every kept sample.
    ///
    /// The band is tested on the unrounded `spread_bps`; the kept copy has it
    /// rounded. Nothing is kept when no threshold is configured.
    pub fn select(
        &self,
        samples: &[SpreadSample],
        thresholds: &SpreadThresholds,
    ) -> Vec<SpreadSample> {
        if !thresholds.is_configured() {
            debug!(
                evaluated = samples.len(),
                "No thresholds configured, nothing selected"
            );
            return Vec::new();
        }

        let mut included = Vec::new();
        for sample in samples {
            if thresholds.admits(sample.spread_bps) {
                let recorded = sample.clone().with_rounded_bps();
                self.sink.emit(&recorded);
                included.push(recorded);
            } else {
                trace!(symbol = %sample.symbol, spread_bps = ?sample.spread_bps, "Outside band");
            }
        }
        included
    }

    /// Evaluate all candidates and return the in-band samples.
    pub async fn compute_spreads(
        &self,
        candidates: &[MarketCandidate],
        thresholds: &SpreadThresholds,
    ) -> Vec<SpreadSample> {
        self.run_cycle(candidates, thresholds).await.included
    }

    /// Evaluate all candidates and summarize the cycle.
    pub async fn run_cycle(
        &self,
        candidates: &[MarketCandidate],
        thresholds: &SpreadThresholds,
    ) -> CycleOutcome {
        let samples = self.evaluate_all(candidates).await;
        let included = self.select(&samples, thresholds);
        let summary = CycleSummary::from_samples(&samples, &included, self.top_n);
        CycleOutcome { included, summary }
    }
}

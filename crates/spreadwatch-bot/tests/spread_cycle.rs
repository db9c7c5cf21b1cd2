//! End-to-end spread cycles against a scripted quote source.

use async_trait::async_trait;
use spreadwatch_bot::{SpreadLoop, SpreadPhase};
use spreadwatch_core::{ExchangeId, MarketCandidate, QuoteSnapshot, SpreadSample};
use spreadwatch_detector::{SignalSink, SpreadEngine, SpreadThresholds};
use spreadwatch_persistence::{CandidateStore, ResultsStore, SignalJournal};
use spreadwatch_registry::QuoteSource;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Quote source with fixed books; unknown symbols behave like a failed fetch.
#[derive(Clone, Default)]
struct ScriptedQuotes {
    books: HashMap<(ExchangeId, String), QuoteSnapshot>,
    delay: Option<Duration>,
}

impl ScriptedQuotes {
    fn book(mut self, venue: ExchangeId, raw: &str, bid: f64, ask: f64) -> Self {
        self.books.insert(
            (venue, raw.to_string()),
            QuoteSnapshot::new(Some(bid), Some(ask)),
        );
        self
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuotes {
    async fn top_of_book(&self, venue: ExchangeId, raw_symbol: &str) -> QuoteSnapshot {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.books
            .get(&(venue, raw_symbol.to_string()))
            .copied()
            .unwrap_or_else(QuoteSnapshot::absent)
    }
}

#[derive(Default)]
struct CountingSink {
    count: Mutex<usize>,
}

impl SignalSink for CountingSink {
    fn emit(&self, _sample: &SpreadSample) {
        *self.count.lock().unwrap() += 1;
    }
}

/// BTC ~44.9 bps, ETH quoted only on exchange A.
fn quotes() -> ScriptedQuotes {
    ScriptedQuotes::default()
        .book(ExchangeId::A, "BTCUSDT", 100.45, 100.45)
        .book(ExchangeId::B, "BTCUSDT", 100.0, 100.0)
        .book(ExchangeId::A, "ETHUSDT", 2000.0, 2001.0)
}

fn write_candidates(path: &Path) {
    let candidates = vec![
        MarketCandidate::new("BTC", 5e8, 4e8, "BTCUSDT", "BTCUSDT"),
        MarketCandidate::new("ETH", 3e8, 2e8, "ETHUSDT", "ETHUSDT"),
    ];
    CandidateStore::new(path).replace(&candidates).unwrap();
}

fn build_loop(
    dir: &Path,
    source: ScriptedQuotes,
    thresholds: SpreadThresholds,
    sink: Arc<CountingSink>,
) -> SpreadLoop<ScriptedQuotes> {
    SpreadLoop::new(
        SpreadEngine::new(source).with_sink(sink),
        CandidateStore::new(dir.join("candidates.json")),
        ResultsStore::new(dir.join("out/spreads.json")),
        thresholds,
        Duration::from_secs(30),
    )
}

#[tokio::test]
async fn cycle_writes_only_in_band_samples() {
    let dir = TempDir::new().unwrap();
    write_candidates(&dir.path().join("candidates.json"));
    let sink = Arc::new(CountingSink::default());
    let mut spread_loop = build_loop(
        dir.path(),
        quotes(),
        SpreadThresholds::new(Some(10.0), Some(50.0)),
        sink.clone(),
    );

    let summary = spread_loop.run_cycle().await.unwrap();

    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.quoted, 1);
    assert_eq!(summary.included, 1);
    assert_eq!(*sink.count.lock().unwrap(), 1);
    assert_eq!(spread_loop.phase(), SpreadPhase::Idle);

    let results = ResultsStore::new(dir.path().join("out/spreads.json"))
        .load()
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol, "BTC/USDT");
    assert!((results[0].spread_bps.unwrap() - 44.9).abs() < 1e-9);
}

#[tokio::test]
async fn no_thresholds_writes_empty_results() {
    let dir = TempDir::new().unwrap();
    write_candidates(&dir.path().join("candidates.json"));
    let mut spread_loop = build_loop(
        dir.path(),
        quotes(),
        SpreadThresholds::default(),
        Arc::new(CountingSink::default()),
    );

    let summary = spread_loop.run_cycle().await.unwrap();

    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.included, 0);
    let raw = std::fs::read_to_string(dir.path().join("out/spreads.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[tokio::test]
async fn missing_candidate_store_is_zero_candidates() {
    let dir = TempDir::new().unwrap();
    let mut spread_loop = build_loop(
        dir.path(),
        quotes(),
        SpreadThresholds::new(Some(0.0), None),
        Arc::new(CountingSink::default()),
    );

    let summary = spread_loop.run_cycle().await.unwrap();

    assert_eq!(summary.evaluated, 0);
    assert!(ResultsStore::new(dir.path().join("out/spreads.json"))
        .load()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn corrupt_candidate_store_is_zero_candidates() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("candidates.json"), "not json").unwrap();
    let mut spread_loop = build_loop(
        dir.path(),
        quotes(),
        SpreadThresholds::new(Some(0.0), None),
        Arc::new(CountingSink::default()),
    );

    let summary = spread_loop.run_cycle().await.unwrap();
    assert_eq!(summary.evaluated, 0);
}

#[tokio::test]
async fn journal_receives_included_samples() {
    let dir = TempDir::new().unwrap();
    write_candidates(&dir.path().join("candidates.json"));
    let journal_dir = dir.path().join("journal");
    let mut spread_loop = build_loop(
        dir.path(),
        quotes(),
        SpreadThresholds::new(None, Some(100.0)),
        Arc::new(CountingSink::default()),
    )
    .with_journal(SignalJournal::new(&journal_dir).unwrap());

    spread_loop.run_cycle().await.unwrap();
    drop(spread_loop);

    let files: Vec<_> = std::fs::read_dir(&journal_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].path()).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_while_computing_leaves_results_untouched() {
    let dir = TempDir::new().unwrap();
    write_candidates(&dir.path().join("candidates.json"));
    let results_path = dir.path().join("out/spreads.json");

    let previous = vec![SpreadSample::from_quotes(
        "SOL",
        QuoteSnapshot::new(Some(1.0), Some(1.0)),
        QuoteSnapshot::new(Some(1.0), Some(1.0)),
    )];
    ResultsStore::new(&results_path).replace(&previous).unwrap();

    let spread_loop = build_loop(
        dir.path(),
        quotes().delayed(Duration::from_secs(60)),
        SpreadThresholds::new(Some(0.0), None),
        Arc::new(CountingSink::default()),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(spread_loop.run(cancel.clone()));

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(ResultsStore::new(&results_path).load().unwrap(), previous);
}

#[tokio::test(start_paused = true)]
async fn loop_repeats_every_interval_until_cancelled() {
    let dir = TempDir::new().unwrap();
    write_candidates(&dir.path().join("candidates.json"));
    let sink = Arc::new(CountingSink::default());
    let spread_loop = build_loop(
        dir.path(),
        quotes(),
        SpreadThresholds::new(Some(10.0), None),
        sink.clone(),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(spread_loop.run(cancel.clone()));

    // Cycles at t=0, 30, 60.
    tokio::time::sleep(Duration::from_secs(75)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(*sink.count.lock().unwrap(), 3);
}

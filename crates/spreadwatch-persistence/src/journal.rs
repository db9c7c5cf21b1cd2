//! JSON Lines journal of emitted signals.
//!
//! - One file per UTC day: `signals_<YYYY-MM-DD>.jsonl`
//! - Append mode, so restarts never truncate earlier signals
//! - Each line is a complete record; an interrupted write only affects its line

use crate::error::PersistenceResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spreadwatch_core::SpreadSample;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One journaled signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub timestamp_ms: i64,
    #[serde(flatten)]
    pub sample: SpreadSample,
}

/// Active writer state for the current day's file.
struct ActiveWriter {
    writer: BufWriter<File>,
    date: String,
    records_written: usize,
}

/// Append-only signal journal with daily rotation.
pub struct SignalJournal {
    base_dir: PathBuf,
    active_writer: Option<ActiveWriter>,
}

impl SignalJournal {
    /// Create a journal rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> PersistenceResult<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            active_writer: None,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Journal file for a given day.
    pub fn file_for(&self, date: &str) -> PathBuf {
        self.base_dir.join(format!("signals_{date}.jsonl"))
    }

    /// Append samples stamped with the current time.
    pub fn append(&mut self, samples: &[SpreadSample]) -> PersistenceResult<usize> {
        self.append_at(samples, Utc::now())
    }

    /// Append samples stamped with `now`, rotating if the day changed.
    pub fn append_at(
        &mut self,
        samples: &[SpreadSample],
        now: DateTime<Utc>,
    ) -> PersistenceResult<usize> {
        if samples.is_empty() {
            return Ok(0);
        }

        let today = now.format("%Y-%m-%d").to_string();
        let timestamp_ms = now.timestamp_millis();

        let needs_rotation = self
            .active_writer
            .as_ref()
            .is_some_and(|w| w.date != today);
        if needs_rotation {
            self.close_active_writer();
        }

        let active = match self.active_writer.take() {
            Some(active) => active,
            None => self.open_writer(&today)?,
        };
        let active = self.active_writer.insert(active);

        for sample in samples {
            let record = JournalRecord {
                timestamp_ms,
                sample: sample.clone(),
            };
            let json = serde_json::to_string(&record)?;
            writeln!(active.writer, "{json}")?;
        }
        active.writer.flush()?;
        active.records_written += samples.len();

        debug!(date = %today, records = samples.len(), "Journaled signals");
        Ok(samples.len())
    }

    /// Flush and close the current file.
    pub fn close(&mut self) {
        self.close_active_writer();
    }

    fn open_writer(&self, date: &str) -> PersistenceResult<ActiveWriter> {
        let path = self.file_for(date);
        info!(path = %path.display(), "Opening signal journal (append mode)");

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(ActiveWriter {
            writer: BufWriter::new(file),
            date: date.to_string(),
            records_written: 0,
        })
    }

    fn close_active_writer(&mut self) {
        if let Some(mut active) = self.active_writer.take() {
            if let Err(e) = active.writer.flush() {
                warn!(?e, "Failed to flush journal on close");
            }
            info!(
                date = %active.date,
                records = active.records_written,
                "Closed signal journal"
            );
        }
    }
}

impl Drop for SignalJournal {
    fn drop(&mut self) {
        self.close_active_writer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use spreadwatch_core::QuoteSnapshot;
    use std::io::{BufRead, BufReader};
    use tempfile::TempDir;

    fn sample(base: &str) -> SpreadSample {
        SpreadSample::from_quotes(
            base,
            QuoteSnapshot::new(Some(101.0), Some(101.0)),
            QuoteSnapshot::new(Some(100.0), Some(100.0)),
        )
        .with_rounded_bps()
    }

    fn read_lines(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        BufReader::new(file).lines().map_while(Result::ok).collect()
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = SignalJournal::new(temp_dir.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        journal.append_at(&[sample("BTC"), sample("ETH")], now).unwrap();
        journal.close();

        let lines = read_lines(&journal.file_for("2024-03-01"));
        assert_eq!(lines.len(), 2);

        let record: JournalRecord = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(record.timestamp_ms, now.timestamp_millis());
        assert_eq!(record.sample, sample("BTC"));

        let raw: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(raw["symbol"], "ETH/USDT");
        assert_eq!(raw["spread_bps"], 99.5);
    }

    #[test]
    fn test_append_mode_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        for _ in 0..2 {
            let mut journal = SignalJournal::new(temp_dir.path()).unwrap();
            journal.append_at(&[sample("BTC")], now).unwrap();
        }

        let path = temp_dir.path().join("signals_2024-03-01.jsonl");
        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_daily_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = SignalJournal::new(temp_dir.path()).unwrap();

        let day1 = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 3, 2, 0, 1, 0).unwrap();
        journal.append_at(&[sample("BTC")], day1).unwrap();
        journal.append_at(&[sample("BTC"), sample("SOL")], day2).unwrap();
        journal.close();

        assert_eq!(read_lines(&journal.file_for("2024-03-01")).len(), 1);
        assert_eq!(read_lines(&journal.file_for("2024-03-02")).len(), 2);
    }

    #[test]
    fn test_empty_append_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut journal = SignalJournal::new(temp_dir.path()).unwrap();

        assert_eq!(journal.append(&[]).unwrap(), 0);

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert!(entries.is_empty());
    }
}

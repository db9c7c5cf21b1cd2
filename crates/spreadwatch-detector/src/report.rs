//! Per-cycle summary and top-N ranking.
//!
//! Only samples that passed the threshold band are ranked, using their
//! recorded (rounded) `spread_bps`. A cycle with no thresholds has an empty
//! ranking.

use serde::Serialize;
use spreadwatch_core::SpreadSample;
use std::cmp::Ordering;
use std::fmt;

/// Number of samples surfaced in a cycle summary.
pub const DEFAULT_TOP_N: usize = 5;

/// A ranked summary entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSpread {
    pub symbol: String,
    pub spread_bps: f64,
}

/// Top `n` samples by `abs(spread_bps)`, descending.
///
/// Samples without `spread_bps` are skipped. Ties keep input order.
pub fn top_by_abs_bps(samples: &[SpreadSample], n: usize) -> Vec<RankedSpread> {
    let mut ranked: Vec<RankedSpread> = samples
        .iter()
        .filter_map(|s| {
            s.spread_bps.map(|bps| RankedSpread {
                symbol: s.symbol.clone(),
                spread_bps: bps,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.spread_bps
            .abs()
            .partial_cmp(&a.spread_bps.abs())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Outcome of one spread cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleSummary {
    /// Candidates evaluated.
    pub evaluated: usize,
    /// Samples with a computable `spread_bps`.
    pub quoted: usize,
    /// Samples inside the threshold band.
    pub included: usize,
    /// Largest spreads among the included samples.
    pub top: Vec<RankedSpread>,
}

impl CycleSummary {
    /// Summarize a cycle from every evaluated sample and the included subset.
    pub fn from_samples(
        evaluated: &[SpreadSample],
        included: &[SpreadSample],
        top_n: usize,
    ) -> Self {
        Self {
            evaluated: evaluated.len(),
            quoted: evaluated.iter().filter(|s| s.spread_bps.is_some()).count(),
            included: included.len(),
            top: top_by_abs_bps(included, top_n),
        }
    }
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "evaluated={} quoted={} included={}",
            self.evaluated, self.quoted, self.included
        )?;
        if !self.top.is_empty() {
            write!(f, " top=[")?;
            for (i, entry) in self.top.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} {:.2}bps", entry.symbol, entry.spread_bps)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

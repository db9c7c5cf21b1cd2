//! Signal output for samples inside the threshold band.

use spreadwatch_core::SpreadSample;
use std::io::Write;
use tracing::{info, warn};

/// ASCII bell.
const BELL: &str = "\x07";

/// Receiver of in-band samples.
///
/// Called once per included sample per cycle; repeats across cycles are
/// expected.
pub trait SignalSink: Send + Sync {
    fn emit(&self, sample: &SpreadSample);
}

/// Rings the terminal bell and prints a one-line notice to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl TerminalBell {
    /// Line printed for a sample, without the bell.
    pub fn format_line(sample: &SpreadSample) -> String {
        match sample.spread_bps {
            Some(bps) => format!("[Signal] {} within range: {:.2} bps", sample.symbol, bps),
            None => format!("[Signal] {} within range", sample.symbol),
        }
    }
}

impl SignalSink for TerminalBell {
    fn emit(&self, sample: &SpreadSample) {
        info!(
            symbol = %sample.symbol,
            spread_bps = ?sample.spread_bps,
            spread_abs = ?sample.spread_abs,
            mid_a = ?sample.mid_a,
            mid_b = ?sample.mid_b,
            "Spread signal"
        );

        let mut stdout = std::io::stdout().lock();
        let written = write!(stdout, "{BELL}")
            .and_then(|()| writeln!(stdout, "{}", Self::format_line(sample)))
            .and_then(|()| stdout.flush());
        if let Err(e) = written {
            warn!(error = %e, "Failed to write signal to stdout");
        }
    }
}

//! Cross-exchange spread evaluation.
//!
//! For every candidate the engine fetches top-of-book from both exchanges,
//! computes mids and the normalized spread, and keeps only samples inside the
//! configured basis-point band. Each kept sample is also pushed to a
//! [`SignalSink`].

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod signal;

pub use config::SpreadThresholds;
pub use engine::{CycleOutcome, SpreadEngine, DEFAULT_MAX_IN_FLIGHT};
pub use error::{DetectorError, DetectorResult};
pub use report::{top_by_abs_bps, CycleSummary, RankedSpread, DEFAULT_TOP_N};
pub use signal::{SignalSink, TerminalBell};

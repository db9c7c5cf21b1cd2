//! Structured logging for spreadwatch.
//!
//! JSON lines in production, pretty output during development.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, DEFAULT_FILTER};

//! Detector error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
}

pub type DetectorResult<T> = Result<T, DetectorError>;

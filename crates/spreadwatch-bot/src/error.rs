//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Registry error: {0}")]
    Registry(#[from] spreadwatch_registry::RegistryError),

    #[error("Detector error: {0}")]
    Detector(#[from] spreadwatch_detector::DetectorError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] spreadwatch_persistence::PersistenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] spreadwatch_telemetry::TelemetryError),

    #[error("Task failed: {0}")]
    Task(String),
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

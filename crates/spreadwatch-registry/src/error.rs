//! Registry error types.

use spreadwatch_core::ExchangeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed {venue} response: {reason}")]
    Malformed { venue: ExchangeId, reason: String },

    #[error("{venue} API error {code}: {message}")]
    Api {
        venue: ExchangeId,
        code: i64,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    pub(crate) fn malformed(venue: ExchangeId, reason: impl Into<String>) -> Self {
        Self::Malformed {
            venue,
            reason: reason.into(),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

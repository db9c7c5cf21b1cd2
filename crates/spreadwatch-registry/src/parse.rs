//! Helpers for loosely typed exchange JSON.

use crate::error::{RegistryError, RegistryResult};
use serde_json::Value;
use spreadwatch_core::ExchangeId;

/// Read a number that exchanges send either as a JSON string or a number.
pub(crate) fn number_or_string(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Price of the first (best) level in a `[[price, qty], ...]` ladder.
///
/// An empty ladder is `Ok(None)`; a first level without a readable price is
/// an error so the whole snapshot resolves to "no data".
pub(crate) fn best_level_price(
    venue: ExchangeId,
    side: &str,
    levels: Option<&Value>,
) -> RegistryResult<Option<f64>> {
    let levels = levels
        .and_then(Value::as_array)
        .ok_or_else(|| RegistryError::malformed(venue, format!("`{side}` is not an array")))?;

    match levels.first() {
        None => Ok(None),
        Some(level) => number_or_string(level.get(0))
            .map(Some)
            .ok_or_else(|| RegistryError::malformed(venue, format!("bad best `{side}` level"))),
    }
}

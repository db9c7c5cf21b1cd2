//! Exchange identifiers and symbol conventions.
//!
//! Exchange A is Binance USDT-M futures, exchange B is Bybit v5 linear.
//! Both quote perpetuals as `<BASE>USDT`, but raw symbols are always carried
//! per exchange and never assumed to be textually identical.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote asset of every monitored perpetual.
pub const USDT: &str = "USDT";

/// Base-asset prefixes that are never candidates (e.g. `1000PEPE` wraps `PEPE`).
pub const EXCLUDED_BASE_PREFIXES: &[&str] = &["1000"];

/// Monitored exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    /// Binance USDT-M futures.
    Binance,
    /// Bybit v5 linear contracts.
    Bybit,
}

impl ExchangeId {
    /// Exchange A in the spread definition (`spread = mid_a - mid_b`).
    pub const A: Self = Self::Binance;
    /// Exchange B in the spread definition.
    pub const B: Self = Self::Bybit;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Bybit => "bybit",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable pair name, e.g. `BTC/USDT`.
pub fn display_symbol(base: &str) -> String {
    format!("{base}/{USDT}")
}

/// Strip the `USDT` suffix from a raw symbol.
///
/// Returns `None` for symbols not quoted in USDT or with an empty base.
pub fn base_from_usdt_symbol(raw_symbol: &str) -> Option<&str> {
    raw_symbol.strip_suffix(USDT).filter(|base| !base.is_empty())
}

/// Whether a base asset matches one of [`EXCLUDED_BASE_PREFIXES`].
pub fn is_excluded_base(base: &str) -> bool {
    EXCLUDED_BASE_PREFIXES
        .iter()
        .any(|prefix| base.starts_with(prefix))
}

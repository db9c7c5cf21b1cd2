//! Spread samples computed each polling cycle.

use crate::decimal::round_to;
use crate::exchange::display_symbol;
use crate::quote::QuoteSnapshot;
use serde::{Deserialize, Serialize};

/// Basis points per unit of relative spread.
pub const BPS_PER_UNIT: f64 = 10_000.0;

/// Decimal places kept for `spread_bps` in recorded samples.
pub const BPS_DECIMALS: u32 = 2;

/// Mid prices and cross-exchange spread for one candidate at one instant.
///
/// Every price field is nullable: a failed quote fetch yields `None`
/// rather than zero, and `None` propagates into the mids and the spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadSample {
    pub base: String,
    pub symbol: String,
    #[serde(rename = "binance_bid", alias = "exchange_a_bid")]
    pub exchange_a_bid: Option<f64>,
    #[serde(rename = "binance_ask", alias = "exchange_a_ask")]
    pub exchange_a_ask: Option<f64>,
    #[serde(rename = "bybit_bid", alias = "exchange_b_bid")]
    pub exchange_b_bid: Option<f64>,
    #[serde(rename = "bybit_ask", alias = "exchange_b_ask")]
    pub exchange_b_ask: Option<f64>,
    #[serde(rename = "mid_binance", alias = "mid_a")]
    pub mid_a: Option<f64>,
    #[serde(rename = "mid_bybit", alias = "mid_b")]
    pub mid_b: Option<f64>,
    /// `mid_a - mid_b`, never rounded.
    pub spread_abs: Option<f64>,
    /// Spread normalized by the average mid, in basis points.
    pub spread_bps: Option<f64>,
}

impl SpreadSample {
    /// Build a sample from one quote per exchange.
    pub fn from_quotes(base: &str, quote_a: QuoteSnapshot, quote_b: QuoteSnapshot) -> Self {
        let mid_a = quote_a.mid();
        let mid_b = quote_b.mid();
        let (spread_abs, spread_bps) = spread(mid_a, mid_b);

        Self {
            base: base.to_string(),
            symbol: display_symbol(base),
            exchange_a_bid: quote_a.bid,
            exchange_a_ask: quote_a.ask,
            exchange_b_bid: quote_b.bid,
            exchange_b_ask: quote_b.ask,
            mid_a,
            mid_b,
            spread_abs,
            spread_bps,
        }
    }

    /// `abs(spread_bps)` when present.
    pub fn abs_bps(&self) -> Option<f64> {
        self.spread_bps.map(f64::abs)
    }

    /// Copy of the sample with `spread_bps` rounded to [`BPS_DECIMALS`].
    ///
    /// `spread_abs` is left as computed.
    #[must_use]
    pub fn with_rounded_bps(mut self) -> Self {
        self.spread_bps = self.spread_bps.map(|bps| round_to(bps, BPS_DECIMALS));
        self
    }
}

/// Absolute and basis-point spread between two mids.
///
/// `spread_abs = mid_a - mid_b` whenever both mids are present.
/// `spread_bps = spread_abs / ((mid_a + mid_b) / 2) * 10000` additionally
/// requires a nonzero average.
pub fn spread(mid_a: Option<f64>, mid_b: Option<f64>) -> (Option<f64>, Option<f64>) {
    let (Some(a), Some(b)) = (mid_a, mid_b) else {
        return (None, None);
    };

    let spread_abs = a - b;
    let denom = (a + b) / 2.0;
    let spread_bps = if denom != 0.0 {
        Some(spread_abs / denom * BPS_PER_UNIT)
    } else {
        None
    };

    (Some(spread_abs), spread_bps)
}

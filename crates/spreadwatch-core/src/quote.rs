//! Top-of-book quote snapshot.

use serde::{Deserialize, Serialize};

/// Best bid/ask on one exchange at one instant.
///
/// A side that could not be fetched or parsed is `None`. It is never
/// represented as a zero price.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

impl QuoteSnapshot {
    pub fn new(bid: Option<f64>, ask: Option<f64>) -> Self {
        Self { bid, ask }
    }

    /// Snapshot with both sides absent ("no data").
    pub const fn absent() -> Self {
        Self {
            bid: None,
            ask: None,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.bid.is_none() && self.ask.is_none()
    }

    /// Mid price, present only when both sides are.
    pub fn mid(&self) -> Option<f64> {
        mid_price(self.bid, self.ask)
    }
}

/// `(bid + ask) / 2` when both sides are present.
pub fn mid_price(bid: Option<f64>, ask: Option<f64>) -> Option<f64> {
    Some((bid? + ask?) / 2.0)
}

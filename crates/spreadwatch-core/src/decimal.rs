//! Decimal rounding for persisted floating-point values.
//!
//! Prices and spreads are carried as `f64` end to end. Values written to disk
//! are rounded through `rust_decimal` so that `12.345` rounds on its decimal
//! representation rather than on its binary approximation.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` to `dp` decimal places, ties to even.
///
/// Non-finite or out-of-range values are returned unchanged.
pub fn round_to(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

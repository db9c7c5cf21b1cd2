//! Spread inclusion band.

use crate::error::{DetectorError, DetectorResult};
use serde::{Deserialize, Serialize};

/// Inclusion band on `abs(spread_bps)`.
///
/// Both bounds are optional and inclusive. With neither bound set the band
/// admits nothing: thresholds are the only selection mechanism, so an
/// unconfigured engine observes without signaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadThresholds {
    /// Lower bound on `abs(spread_bps)`.
    #[serde(default)]
    pub min_bps: Option<f64>,
    /// Upper bound on `abs(spread_bps)`.
    #[serde(default)]
    pub max_bps: Option<f64>,
}

impl SpreadThresholds {
    pub fn new(min_bps: Option<f64>, max_bps: Option<f64>) -> Self {
        Self { min_bps, max_bps }
    }

    /// At least one bound is set.
    pub fn is_configured(&self) -> bool {
        self.min_bps.is_some() || self.max_bps.is_some()
    }

    /// Whether a sample with this `spread_bps` belongs in the output.
    pub fn admits(&self, spread_bps: Option<f64>) -> bool {
        if !self.is_configured() {
            return false;
        }
        let Some(bps) = spread_bps else {
            return false;
        };

        let magnitude = bps.abs();
        if self.min_bps.is_some_and(|min| magnitude < min) {
            return false;
        }
        if self.max_bps.is_some_and(|max| magnitude > max) {
            return false;
        }
        true
    }

    /// Validate bound values.
    ///
    /// Returns Err if:
    /// - a bound is NaN, infinite or negative
    /// - both bounds are set and `min_bps > max_bps`
    pub fn validate(&self) -> DetectorResult<()> {
        for (name, bound) in [("min_bps", self.min_bps), ("max_bps", self.max_bps)] {
            if let Some(value) = bound {
                if !value.is_finite() {
                    return Err(DetectorError::InvalidThresholds(format!(
                        "{name} ({value}) must be a finite number"
                    )));
                }
                if value < 0.0 {
                    return Err(DetectorError::InvalidThresholds(format!(
                        "{name} ({value}) must be non-negative"
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_bps, self.max_bps) {
            if min > max {
                return Err(DetectorError::InvalidThresholds(format!(
                    "min_bps ({min}) must not exceed max_bps ({max})"
                )));
            }
        }

        Ok(())
    }
}

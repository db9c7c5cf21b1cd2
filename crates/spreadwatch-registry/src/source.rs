//! Data-source seams used by the scanner and the spread engine.

use crate::error::RegistryResult;
use async_trait::async_trait;
use spreadwatch_core::{ExchangeId, QuoteSnapshot};
use std::collections::{BTreeMap, HashMap};

/// One exchange's tradable USDT perpetuals and their 24h turnover.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueUniverse {
    /// Base asset -> raw exchange symbol.
    pub listings: BTreeMap<String, String>,
    /// Raw exchange symbol -> 24h turnover in USD.
    pub volume_usd: HashMap<String, f64>,
}

impl VenueUniverse {
    /// Register a tradable listing.
    pub fn insert_listing(&mut self, base: impl Into<String>, raw_symbol: impl Into<String>) {
        self.listings.insert(base.into(), raw_symbol.into());
    }

    /// Register the 24h turnover for a raw symbol.
    pub fn insert_volume(&mut self, raw_symbol: impl Into<String>, volume_usd: f64) {
        self.volume_usd.insert(raw_symbol.into(), volume_usd);
    }

    /// Raw symbol for a base asset, if listed.
    pub fn raw_symbol(&self, base: &str) -> Option<&str> {
        self.listings.get(base).map(String::as_str)
    }

    /// 24h turnover for a raw symbol; 0.0 when unknown.
    pub fn volume_for(&self, raw_symbol: &str) -> f64 {
        self.volume_usd.get(raw_symbol).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Top-of-book provider.
///
/// Implementations never fail: any transport, status or parse error
/// resolves to [`QuoteSnapshot::absent`], so one exchange outage cannot abort
/// a spread cycle for the other instruments.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn top_of_book(&self, venue: ExchangeId, raw_symbol: &str) -> QuoteSnapshot;
}

/// Full-universe provider for the market scanner.
///
/// Unlike [`QuoteSource`], errors propagate: an incomplete universe would
/// silently shrink the intersection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UniverseSource: Send + Sync {
    async fn universe(&self, venue: ExchangeId) -> RegistryResult<VenueUniverse>;
}

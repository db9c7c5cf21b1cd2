//! Common high-volume market discovery.
//!
//! Intersects the USDT perpetual universes of exchange A and exchange B and
//! keeps the bases whose 24h volume meets the floor on *both* venues.

use crate::error::RegistryResult;
use crate::source::{UniverseSource, VenueUniverse};
use spreadwatch_core::{is_excluded_base, ExchangeId, MarketCandidate};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Default 24h volume floor per exchange (USD).
pub const DEFAULT_MIN_VOLUME_USD: f64 = 300_000.0;

/// Market scanner over a [`UniverseSource`].
pub struct MarketScanner<S> {
    source: S,
}

impl<S: UniverseSource> MarketScanner<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Discover candidates tradable on both exchanges with enough volume.
    ///
    /// Any universe fetch error aborts the scan; callers keep the previous
    /// candidate list and retry on the next interval.
    pub async fn find_common_high_volume_futures(
        &self,
        min_volume_usd: f64,
    ) -> RegistryResult<Vec<MarketCandidate>> {
        info!("Loading exchange universes");

        let (universe_a, universe_b) = tokio::try_join!(
            self.source.universe(ExchangeId::A),
            self.source.universe(ExchangeId::B)
        )?;

        for (venue, universe) in [(ExchangeId::A, &universe_a), (ExchangeId::B, &universe_b)] {
            if universe.is_empty() {
                warn!(%venue, "Exchange returned no tradable USDT perpetuals");
            }
        }

        let candidates = select_candidates(&universe_a, &universe_b, min_volume_usd);

        info!(
            listings_a = universe_a.len(),
            listings_b = universe_b.len(),
            min_volume_usd,
            candidates = candidates.len(),
            "Candidates meeting volume threshold"
        );

        Ok(candidates)
    }
}

/// Pure selection step of the scan.
///
/// 1. Drop exchange-A bases matching an excluded prefix.
/// 2. Intersect the remaining bases with exchange B's.
/// 3. Keep a base only if both volumes independently meet `min_volume_usd`.
///
/// Output is sorted by base asset.
pub fn select_candidates(
    universe_a: &VenueUniverse,
    universe_b: &VenueUniverse,
    min_volume_usd: f64,
) -> Vec<MarketCandidate> {
    let bases_a: BTreeSet<&str> = universe_a
        .listings
        .keys()
        .map(String::as_str)
        .filter(|base| !is_excluded_base(base))
        .collect();
    let bases_b: BTreeSet<&str> = universe_b.listings.keys().map(String::as_str).collect();

    let common: Vec<&str> = bases_a.intersection(&bases_b).copied().collect();
    debug!(common = common.len(), "Common bases found");

    let mut candidates = Vec::new();
    for base in common {
        let (Some(raw_a), Some(raw_b)) = (universe_a.raw_symbol(base), universe_b.raw_symbol(base))
        else {
            continue;
        };
        if raw_a.is_empty() || raw_b.is_empty() {
            continue;
        }

        let volume_a = universe_a.volume_for(raw_a);
        let volume_b = universe_b.volume_for(raw_b);

        if volume_a >= min_volume_usd && volume_b >= min_volume_usd {
            candidates.push(MarketCandidate::new(base, volume_a, volume_b, raw_a, raw_b));
        } else {
            debug!(base, volume_a, volume_b, "Below volume floor on at least one exchange");
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::source::MockUniverseSource;

    fn universe(entries: &[(&str, f64)]) -> VenueUniverse {
        let mut universe = VenueUniverse::default();
        for (base, volume) in entries {
            let raw = format!("{base}USDT");
            universe.insert_listing(*base, raw.clone());
            universe.insert_volume(raw, *volume);
        }
        universe
    }

    fn exchange_a() -> VenueUniverse {
        universe(&[("BTC", 500_000.0), ("ETH", 100_000.0), ("SOL", 400_000.0)])
    }

    fn exchange_b() -> VenueUniverse {
        universe(&[("BTC", 600_000.0), ("SOL", 200_000.0), ("XRP", 1_000_000.0)])
    }

    fn mock_source() -> MockUniverseSource {
        let mut source = MockUniverseSource::new();
        source.expect_universe().returning(|venue| match venue {
            ExchangeId::Binance => Ok(exchange_a()),
            ExchangeId::Bybit => Ok(exchange_b()),
        });
        source
    }

    #[test]
    fn test_intersection_with_two_sided_floor() {
        let candidates = select_candidates(&exchange_a(), &exchange_b(), 300_000.0);

        assert_eq!(candidates.len(), 1);
        let btc = &candidates[0];
        assert_eq!(btc.symbol, "BTC/USDT");
        assert_eq!(btc.exchange_a_volume_usd, 500_000.0);
        assert_eq!(btc.exchange_b_volume_usd, 600_000.0);
        assert_eq!(btc.exchange_a_raw_symbol, "BTCUSDT");
        assert_eq!(btc.exchange_b_raw_symbol, "BTCUSDT");
    }

    #[test]
    fn test_floor_is_inclusive() {
        let candidates = select_candidates(&exchange_a(), &exchange_b(), 200_000.0);
        let bases: Vec<&str> = candidates.iter().map(|c| c.base()).collect();
        assert_eq!(bases, vec!["BTC", "SOL"]);
    }

    #[test]
    fn test_excluded_prefix_never_selected() {
        let a = universe(&[("1000PEPE", 10_000_000.0), ("PEPE", 10_000_000.0)]);
        let b = universe(&[("1000PEPE", 10_000_000.0), ("PEPE", 10_000_000.0)]);

        let candidates = select_candidates(&a, &b, 0.0);
        let bases: Vec<&str> = candidates.iter().map(|c| c.base()).collect();
        assert_eq!(bases, vec!["PEPE"]);
    }

    #[test]
    fn test_missing_volume_counts_as_zero() {
        let mut a = universe(&[("ADA", 1_000_000.0)]);
        a.volume_usd.clear();
        let b = universe(&[("ADA", 1_000_000.0)]);

        assert!(select_candidates(&a, &b, 1.0).is_empty());
        assert_eq!(select_candidates(&a, &b, 0.0).len(), 1);
    }

    #[test]
    fn test_raw_symbols_may_differ() {
        let mut a = VenueUniverse::default();
        a.insert_listing("SHIB", "SHIBUSDT");
        a.insert_volume("SHIBUSDT", 1e6);
        let mut b = VenueUniverse::default();
        b.insert_listing("SHIB", "SHIB1000USDT");
        b.insert_volume("SHIB1000USDT", 1e6);

        let candidates = select_candidates(&a, &b, 1.0);
        assert_eq!(candidates[0].exchange_a_raw_symbol, "SHIBUSDT");
        assert_eq!(candidates[0].exchange_b_raw_symbol, "SHIB1000USDT");
    }

    #[test]
    fn test_sorted_by_base() {
        let a = universe(&[("ZEC", 1.0), ("AAVE", 1.0), ("LINK", 1.0)]);
        let b = universe(&[("LINK", 1.0), ("ZEC", 1.0), ("AAVE", 1.0)]);

        let bases: Vec<String> = select_candidates(&a, &b, 0.0)
            .iter()
            .map(|c| c.base().to_string())
            .collect();
        assert_eq!(bases, vec!["AAVE", "LINK", "ZEC"]);
    }

    #[tokio::test]
    async fn test_scan_is_idempotent() {
        let scanner = MarketScanner::new(mock_source());

        let first = scanner
            .find_common_high_volume_futures(DEFAULT_MIN_VOLUME_USD)
            .await
            .unwrap();
        let second = scanner
            .find_common_high_volume_futures(DEFAULT_MIN_VOLUME_USD)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].base(), "BTC");
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_scan() {
        let mut source = MockUniverseSource::new();
        source.expect_universe().returning(|venue| match venue {
            ExchangeId::Binance => Ok(exchange_a()),
            ExchangeId::Bybit => Err(RegistryError::malformed(
                ExchangeId::Bybit,
                "tickers result has no `list` array",
            )),
        });

        let scanner = MarketScanner::new(source);
        let result = scanner.find_common_high_volume_futures(0.0).await;
        tokio_test::assert_err!(result);
    }
}

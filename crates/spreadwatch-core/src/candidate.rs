//! Market candidates produced by the scanner.

use crate::decimal::round_to;
use crate::exchange::{display_symbol, ExchangeId};
use serde::{Deserialize, Serialize};

/// Decimal places kept for persisted 24h volumes.
const VOLUME_DECIMALS: u32 = 2;

/// An instrument tradable as a USDT perpetual on both exchanges with enough
/// 24h volume on each.
///
/// On disk the per-exchange fields keep their venue names
/// (`binance_volume_usd`, `bybit_symbol_raw`, ...). The generic
/// `exchange_a_*` / `exchange_b_*` spellings are accepted when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCandidate {
    /// Display symbol (e.g., "BTC/USDT").
    pub symbol: String,
    /// 24h quote volume on exchange A (USD).
    #[serde(rename = "binance_volume_usd", alias = "exchange_a_volume_usd")]
    pub exchange_a_volume_usd: f64,
    /// 24h turnover on exchange B (USD).
    #[serde(rename = "bybit_volume_usd", alias = "exchange_b_volume_usd")]
    pub exchange_b_volume_usd: f64,
    /// Raw symbol used to query exchange A (e.g., "BTCUSDT").
    #[serde(rename = "binance_symbol_raw", alias = "exchange_a_raw_symbol")]
    pub exchange_a_raw_symbol: String,
    /// Raw symbol used to query exchange B.
    #[serde(rename = "bybit_symbol_raw", alias = "exchange_b_raw_symbol")]
    pub exchange_b_raw_symbol: String,
}

impl MarketCandidate {
    /// Create a candidate; volumes are rounded to cents.
    pub fn new(
        base: &str,
        exchange_a_volume_usd: f64,
        exchange_b_volume_usd: f64,
        exchange_a_raw_symbol: impl Into<String>,
        exchange_b_raw_symbol: impl Into<String>,
    ) -> Self {
        Self {
            symbol: display_symbol(base),
            exchange_a_volume_usd: round_to(exchange_a_volume_usd, VOLUME_DECIMALS),
            exchange_b_volume_usd: round_to(exchange_b_volume_usd, VOLUME_DECIMALS),
            exchange_a_raw_symbol: exchange_a_raw_symbol.into(),
            exchange_b_raw_symbol: exchange_b_raw_symbol.into(),
        }
    }

    /// Base asset, derived from the display symbol (`BTC/USDT` -> `BTC`).
    pub fn base(&self) -> &str {
        self.symbol.split('/').next().unwrap_or(&self.symbol)
    }

    /// Raw symbol for the given exchange.
    pub fn raw_symbol(&self, exchange: ExchangeId) -> &str {
        match exchange {
            ExchangeId::Binance => &self.exchange_a_raw_symbol,
            ExchangeId::Bybit => &self.exchange_b_raw_symbol,
        }
    }

    /// Both raw symbols are non-empty.
    pub fn has_raw_symbols(&self) -> bool {
        !self.exchange_a_raw_symbol.is_empty() && !self.exchange_b_raw_symbol.is_empty()
    }
}

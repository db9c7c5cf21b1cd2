//! Binance USDT-M futures response normalization.
//!
//! Endpoints:
//! - `GET /fapi/v1/exchangeInfo`: instrument metadata
//! - `GET /fapi/v1/ticker/24hr`: 24h tickers (`quoteVolume` in USDT)
//! - `GET /fapi/v1/depth`: order book, `bids`/`asks` as `[[price, qty], ...]`

use crate::error::{RegistryError, RegistryResult};
use crate::parse::{best_level_price, number_or_string};
use crate::source::VenueUniverse;
use serde::Deserialize;
use serde_json::Value;
use spreadwatch_core::{ExchangeId, QuoteSnapshot, USDT};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const VENUE: ExchangeId = ExchangeId::Binance;

pub const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
pub const TICKER_24H_PATH: &str = "/fapi/v1/ticker/24hr";
pub const DEPTH_PATH: &str = "/fapi/v1/depth";

const STATUS_TRADING: &str = "TRADING";
const CONTRACT_PERPETUAL: &str = "PERPETUAL";

/// Raw `symbols[]` entry from exchangeInfo.
#[derive(Debug, Deserialize)]
struct RawSymbolInfo {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "contractType", default)]
    contract_type: String,
    #[serde(rename = "quoteAsset", default)]
    quote_asset: String,
    #[serde(rename = "baseAsset", default)]
    base_asset: String,
}

impl RawSymbolInfo {
    fn is_trading_usdt_perpetual(&self) -> bool {
        self.status == STATUS_TRADING
            && self.contract_type == CONTRACT_PERPETUAL
            && self.quote_asset == USDT
            && !self.base_asset.is_empty()
            && !self.symbol.is_empty()
    }
}

/// Actively trading USDT perpetuals: base asset -> raw symbol.
pub fn parse_perpetual_listings(body: &Value) -> RegistryResult<BTreeMap<String, String>> {
    let symbols = body
        .get("symbols")
        .and_then(Value::as_array)
        .ok_or_else(|| RegistryError::malformed(VENUE, "exchangeInfo has no `symbols` array"))?;

    let mut listings = BTreeMap::new();
    for entry in symbols {
        let info: RawSymbolInfo = match serde_json::from_value(entry.clone()) {
            Ok(info) => info,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable exchangeInfo entry");
                continue;
            }
        };
        if info.is_trading_usdt_perpetual() {
            listings.insert(info.base_asset, info.symbol);
        }
    }

    Ok(listings)
}

/// 24h quote volume per raw symbol. Unreadable volumes count as 0.0.
pub fn parse_turnover(body: &Value) -> RegistryResult<HashMap<String, f64>> {
    let tickers = body
        .as_array()
        .ok_or_else(|| RegistryError::malformed(VENUE, "ticker/24hr is not an array"))?;

    let mut volumes = HashMap::with_capacity(tickers.len());
    for ticker in tickers {
        let Some(symbol) = ticker.get("symbol").and_then(Value::as_str) else {
            continue;
        };
        let volume = number_or_string(ticker.get("quoteVolume")).unwrap_or(0.0);
        volumes.insert(symbol.to_string(), volume);
    }

    Ok(volumes)
}

/// Combine exchangeInfo and 24h tickers into a universe.
pub fn parse_universe(exchange_info: &Value, tickers: &Value) -> RegistryResult<VenueUniverse> {
    Ok(VenueUniverse {
        listings: parse_perpetual_listings(exchange_info)?,
        volume_usd: parse_turnover(tickers)?,
    })
}

/// Best bid/ask from a depth snapshot.
pub fn parse_depth(body: &Value) -> RegistryResult<QuoteSnapshot> {
    Ok(QuoteSnapshot::new(
        best_level_price(VENUE, "bids", body.get("bids"))?,
        best_level_price(VENUE, "asks", body.get("asks"))?,
    ))
}

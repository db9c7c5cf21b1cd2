//! Bybit v5 linear response normalization.
//!
//! Endpoints (all with `category=linear`):
//! - `GET /v5/market/tickers`: `result.list[]` with `symbol`, `turnover24h`
//! - `GET /v5/market/orderbook`: `result.b` / `result.a` as `[[price, size], ...]`
//!
//! Every response carries `retCode`; anything but 0 is an API error.

use crate::error::{RegistryError, RegistryResult};
use crate::parse::{best_level_price, number_or_string};
use crate::source::VenueUniverse;
use serde_json::Value;
use spreadwatch_core::{base_from_usdt_symbol, ExchangeId, QuoteSnapshot};

const VENUE: ExchangeId = ExchangeId::Bybit;

pub const TICKERS_PATH: &str = "/v5/market/tickers";
pub const ORDERBOOK_PATH: &str = "/v5/market/orderbook";
pub const CATEGORY_LINEAR: &str = "linear";

/// Unwrap the `result` object, rejecting non-zero `retCode`.
fn result_of(body: &Value) -> RegistryResult<&Value> {
    if let Some(code) = body.get("retCode").and_then(Value::as_i64) {
        if code != 0 {
            let message = body
                .get("retMsg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(RegistryError::Api {
                venue: VENUE,
                code,
                message,
            });
        }
    }

    body.get("result")
        .filter(|r| r.is_object())
        .ok_or_else(|| RegistryError::malformed(VENUE, "response has no `result` object"))
}

/// USDT-quoted linear tickers as a universe (base -> symbol, symbol -> turnover).
pub fn parse_universe(body: &Value) -> RegistryResult<VenueUniverse> {
    let list = result_of(body)?
        .get("list")
        .and_then(Value::as_array)
        .ok_or_else(|| RegistryError::malformed(VENUE, "tickers result has no `list` array"))?;

    let mut universe = VenueUniverse::default();
    for ticker in list {
        let Some(symbol) = ticker.get("symbol").and_then(Value::as_str) else {
            continue;
        };
        let Some(base) = base_from_usdt_symbol(symbol) else {
            continue;
        };
        let turnover = number_or_string(ticker.get("turnover24h")).unwrap_or(0.0);
        universe.insert_listing(base, symbol);
        universe.insert_volume(symbol, turnover);
    }

    Ok(universe)
}

/// Best bid/ask from an orderbook snapshot.
pub fn parse_orderbook(body: &Value) -> RegistryResult<QuoteSnapshot> {
    let result = result_of(body)?;
    Ok(QuoteSnapshot::new(
        best_level_price(VENUE, "b", result.get("b"))?,
        best_level_price(VENUE, "a", result.get("a"))?,
    ))
}

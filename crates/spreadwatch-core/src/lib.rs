//! Core domain types for the cross-exchange spread monitor.
//!
//! This crate provides the types shared by the scanner and the spread loop:
//! - `ExchangeId`: the two monitored venues (Binance futures, Bybit linear)
//! - `QuoteSnapshot`: top-of-book where a missing side stays absent
//! - `MarketCandidate`: an instrument listed with enough volume on both venues
//! - `SpreadSample`: mid prices and normalized spread for one polling cycle

pub mod candidate;
pub mod decimal;
pub mod exchange;
pub mod quote;
pub mod sample;

pub use candidate::MarketCandidate;
pub use decimal::round_to;
pub use exchange::{
    base_from_usdt_symbol, display_symbol, is_excluded_base, ExchangeId, EXCLUDED_BASE_PREFIXES,
    USDT,
};
pub use quote::{mid_price, QuoteSnapshot};
pub use sample::{spread, SpreadSample, BPS_DECIMALS, BPS_PER_UNIT};

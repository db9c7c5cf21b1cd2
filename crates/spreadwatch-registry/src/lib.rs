//! Exchange REST adapters and common-market discovery.
//!
//! - `client`: shared HTTP client with bounded timeouts
//! - `binance` / `bybit`: per-exchange normalization of raw JSON responses
//! - `source`: the `QuoteSource` and `UniverseSource` seams
//! - `scanner`: intersection of both exchanges' USDT perpetuals by volume floor

pub mod binance;
pub mod bybit;
pub mod client;
pub mod error;
mod parse;
pub mod scanner;
pub mod source;

pub use client::{ClientConfig, ExchangeClient, BINANCE_FUTURES_URL, BYBIT_URL};
pub use error::{RegistryError, RegistryResult};
pub use scanner::{select_candidates, MarketScanner, DEFAULT_MIN_VOLUME_USD};
pub use source::{QuoteSource, UniverseSource, VenueUniverse};

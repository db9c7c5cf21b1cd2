//! HTTP client for both exchanges' public REST APIs.
//!
//! One `reqwest::Client` is shared per process. Every request carries a
//! bounded timeout so a stuck call resolves to an error instead of stalling
//! a scan or a spread cycle.

use crate::error::{RegistryError, RegistryResult};
use crate::source::{QuoteSource, UniverseSource, VenueUniverse};
use crate::{binance, bybit};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use spreadwatch_core::{ExchangeId, QuoteSnapshot};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Binance USDT-M futures REST base URL.
pub const BINANCE_FUTURES_URL: &str = "https://fapi.binance.com";

/// Bybit v5 REST base URL.
pub const BYBIT_URL: &str = "https://api.bybit.com";

/// Order book depth requested for top-of-book (only the first level is used).
const DEPTH_LIMIT: &str = "5";

/// Idle keep-alive connections kept per host.
const MAX_IDLE_PER_HOST: usize = 50;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Binance futures base URL.
    pub binance_url: String,
    /// Bybit base URL.
    pub bybit_url: String,
    /// Per-request timeout (connect + read).
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            binance_url: BINANCE_FUTURES_URL.to_string(),
            bybit_url: BYBIT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for exchange market data.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    /// HTTP client.
    client: Client,
    /// Binance futures base URL, without trailing slash.
    binance_url: String,
    /// Bybit base URL, without trailing slash.
    bybit_url: String,
}

impl ExchangeClient {
    /// Create a new exchange client.
    pub fn new(config: ClientConfig) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .user_agent(concat!("spreadwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            binance_url: config.binance_url.trim_end_matches('/').to_string(),
            bybit_url: config.bybit_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, venue: ExchangeId, path: &str) -> String {
        let base = match venue {
            ExchangeId::Binance => &self.binance_url,
            ExchangeId::Bybit => &self.bybit_url,
        };
        format!("{base}{path}")
    }

    /// GET a JSON document.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies are errors.
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> RegistryResult<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| RegistryError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RegistryError::HttpClient(format!("Failed to parse response: {e}")))
    }

    /// Fetch best bid/ask for one raw symbol.
    pub async fn fetch_top_of_book(
        &self,
        venue: ExchangeId,
        raw_symbol: &str,
    ) -> RegistryResult<QuoteSnapshot> {
        match venue {
            ExchangeId::Binance => {
                let url = self.url(venue, binance::DEPTH_PATH);
                let body = self
                    .get_json(&url, &[("symbol", raw_symbol), ("limit", DEPTH_LIMIT)])
                    .await?;
                binance::parse_depth(&body)
            }
            ExchangeId::Bybit => {
                let url = self.url(venue, bybit::ORDERBOOK_PATH);
                let body = self
                    .get_json(
                        &url,
                        &[
                            ("category", bybit::CATEGORY_LINEAR),
                            ("symbol", raw_symbol),
                            ("limit", DEPTH_LIMIT),
                        ],
                    )
                    .await?;
                bybit::parse_orderbook(&body)
            }
        }
    }

    /// Fetch the full USDT-perpetual universe of one exchange.
    pub async fn fetch_universe(&self, venue: ExchangeId) -> RegistryResult<VenueUniverse> {
        info!(%venue, "Fetching instrument universe");

        let universe = match venue {
            ExchangeId::Binance => {
                let info_url = self.url(venue, binance::EXCHANGE_INFO_PATH);
                let ticker_url = self.url(venue, binance::TICKER_24H_PATH);
                let (exchange_info, tickers) = tokio::try_join!(
                    self.get_json(&info_url, &[]),
                    self.get_json(&ticker_url, &[])
                )?;
                binance::parse_universe(&exchange_info, &tickers)?
            }
            ExchangeId::Bybit => {
                let url = self.url(venue, bybit::TICKERS_PATH);
                let body = self
                    .get_json(&url, &[("category", bybit::CATEGORY_LINEAR)])
                    .await?;
                bybit::parse_universe(&body)?
            }
        };

        info!(
            %venue,
            listings = universe.len(),
            volumes = universe.volume_usd.len(),
            "Fetched instrument universe"
        );

        Ok(universe)
    }
}

#[async_trait]
impl QuoteSource for ExchangeClient {
    async fn top_of_book(&self, venue: ExchangeId, raw_symbol: &str) -> QuoteSnapshot {
        match self.fetch_top_of_book(venue, raw_symbol).await {
            Ok(quote) => {
                debug!(
                    %venue,
                    symbol = %raw_symbol,
                    bid = ?quote.bid,
                    ask = ?quote.ask,
                    "Top of book"
                );
                quote
            }
            Err(e) => {
                warn!(
                    %venue,
                    symbol = %raw_symbol,
                    error = %e,
                    "Top-of-book fetch failed, no data"
                );
                QuoteSnapshot::absent()
            }
        }
    }
}

#[async_trait]
impl UniverseSource for ExchangeClient {
    async fn universe(&self, venue: ExchangeId) -> RegistryResult<VenueUniverse> {
        self.fetch_universe(venue).await
    }
}

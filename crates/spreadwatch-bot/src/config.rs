//! Application configuration.
//!
//! Layered lowest first: built-in defaults, an optional TOML file, then
//! `SPREADS_*` environment variables. Empty variables are ignored, so
//! `SPREADS_MIN_BPS=` leaves the bound unset.

use crate::error::{AppError, AppResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use spreadwatch_detector::{SpreadThresholds, DEFAULT_MAX_IN_FLIGHT, DEFAULT_TOP_N};
use spreadwatch_registry::{
    ClientConfig, BINANCE_FUTURES_URL, BYBIT_URL, DEFAULT_MIN_VOLUME_USD,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SPREADS";

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_PATH_ENV: &str = "SPREADS_CONFIG";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Results Store path.
    #[serde(alias = "out")]
    pub results_path: PathBuf,
    /// Sleep between spread cycles (seconds).
    #[serde(alias = "interval")]
    pub poll_interval_secs: f64,
    /// Lower bound on `abs(spread_bps)`.
    pub min_bps: Option<f64>,
    /// Upper bound on `abs(spread_bps)`.
    pub max_bps: Option<f64>,
    /// Candidate Store path.
    pub candidates_path: PathBuf,
    /// Scanner 24h volume floor, applied to each exchange (USD).
    pub min_volume_usd: f64,
    /// Period between scans (seconds).
    pub scan_interval_secs: f64,
    /// Per-request HTTP timeout (seconds).
    pub http_timeout_secs: f64,
    /// Candidates fetched concurrently within one cycle.
    pub max_in_flight: usize,
    /// Entries in the per-cycle ranked summary.
    pub top_n: usize,
    /// Signal journal directory. Disabled when unset.
    pub journal_dir: Option<PathBuf>,
    /// Binance USDT-M futures REST base URL.
    pub binance_url: String,
    /// Bybit v5 REST base URL.
    pub bybit_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from("data/spreads.json"),
            poll_interval_secs: 30.0,
            min_bps: None,
            max_bps: None,
            candidates_path: PathBuf::from("data/candidates.json"),
            min_volume_usd: DEFAULT_MIN_VOLUME_USD,
            scan_interval_secs: 36_000.0, // 10h
            http_timeout_secs: 5.0,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            top_n: DEFAULT_TOP_N,
            journal_dir: None,
            binance_url: BINANCE_FUTURES_URL.to_string(),
            bybit_url: BYBIT_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from an optional TOML file plus the process environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        Self::from_sources(path, environment())
    }

    /// Load from an optional TOML file plus the given environment source.
    pub fn from_sources(path: Option<&Path>, env: Environment) -> AppResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        Self::build(builder.add_source(env))
    }

    /// Load from TOML text plus the given environment source.
    pub fn from_toml_str(toml: &str, env: Environment) -> AppResult<Self> {
        Self::build(
            Config::builder()
                .add_source(File::from_str(toml, FileFormat::Toml))
                .add_source(env),
        )
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> AppResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Returns Err if:
    /// - a threshold is negative or not finite, or `min_bps > max_bps`
    /// - an interval or timeout is not a finite positive number
    /// - `max_in_flight` is 0
    /// - `min_volume_usd` is negative or not finite
    pub fn validate(&self) -> AppResult<()> {
        self.thresholds()
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        self.poll_interval()?;
        self.scan_interval()?;
        self.http_timeout()?;

        if self.max_in_flight == 0 {
            return Err(AppError::Config("max_in_flight must be at least 1".to_string()));
        }
        if !self.min_volume_usd.is_finite() || self.min_volume_usd < 0.0 {
            return Err(AppError::Config(format!(
                "min_volume_usd ({}) must be a non-negative number",
                self.min_volume_usd
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> SpreadThresholds {
        SpreadThresholds::new(self.min_bps, self.max_bps)
    }

    pub fn poll_interval(&self) -> AppResult<Duration> {
        positive_secs("poll_interval_secs", self.poll_interval_secs)
    }

    pub fn scan_interval(&self) -> AppResult<Duration> {
        positive_secs("scan_interval_secs", self.scan_interval_secs)
    }

    pub fn http_timeout(&self) -> AppResult<Duration> {
        positive_secs("http_timeout_secs", self.http_timeout_secs)
    }

    /// HTTP client settings.
    pub fn client_config(&self) -> AppResult<ClientConfig> {
        Ok(ClientConfig {
            binance_url: self.binance_url.clone(),
            bybit_url: self.bybit_url.clone(),
            timeout: self.http_timeout()?,
        })
    }
}

/// `SPREADS_*` environment source.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .ignore_empty(true)
        .try_parsing(true)
}

fn positive_secs(name: &str, secs: f64) -> AppResult<Duration> {
    if secs <= 0.0 {
        return Err(AppError::Config(format!("{name} ({secs}) must be positive")));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| AppError::Config(format!("{name} ({secs}) is not a valid duration: {e}")))
}

//! Runtime configuration.
//!
//! Use the builder methods to customize, or [`AppConfig::from_env`] to read
//! the `GESTOR_*` environment variables.
//!
//! # Example
//!
//! ```ignore
//! use gestor::config::AppConfig;
//! use gestor::domain::StockThresholds;
//!
//! let config = AppConfig::default()
//!     .with_api_url("http://inventario.local/api/")
//!     .with_thresholds(StockThresholds::new(5, 2));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_API_URL;
use crate::domain::StockThresholds;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API base URL without a trailing `/`.
    pub api_url: String,
    /// Directory of the persisted store; `None` means `~/.gestor`.
    pub home: Option<PathBuf>,
    /// Global stock thresholds for items without their own.
    pub thresholds: StockThresholds,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// `tracing_subscriber` filter directive.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            home: None,
            thresholds: StockThresholds::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL; a trailing `/` is dropped.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the directory of the persisted store.
    pub fn with_home(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home = Some(dir.into());
        self
    }

    pub fn with_thresholds(mut self, thresholds: StockThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// Blank values count as unset. Unparseable numbers fall back to the
    /// defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = StockThresholds::default();
        let mut config = Self::default();

        if let Some(url) = get("GESTOR_API_URL") {
            config = config.with_api_url(url.trim());
        }
        if let Some(home) = get("GESTOR_HOME") {
            config = config.with_home(home.trim());
        }

        let bajo = parse_or("GESTOR_UMBRAL_BAJO", get("GESTOR_UMBRAL_BAJO"), defaults.bajo);
        let critico = parse_or(
            "GESTOR_UMBRAL_CRITICO",
            get("GESTOR_UMBRAL_CRITICO"),
            defaults.critico,
        );
        if critico > bajo {
            tracing::warn!(bajo, critico, "critical threshold above low threshold");
        }
        config = config.with_thresholds(StockThresholds::new(bajo, critico));

        let secs = parse_or(
            "GESTOR_TIMEOUT_SECS",
            get("GESTOR_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        );
        config = config.with_timeout(Duration::from_secs(secs));

        config.with_log_filter(log_filter(&lookup))
    }
}

/// Tracing filter from `GESTOR_LOG`, then `RUST_LOG`, else
/// [`DEFAULT_LOG_FILTER`].
///
/// Read before the subscriber exists, so it cannot log.
pub fn log_filter_from_env() -> String {
    log_filter(|key| std::env::var(key).ok())
}

fn log_filter<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["GESTOR_LOG", "RUST_LOG"]
        .iter()
        .filter_map(|key| lookup(key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "invalid value, using default");
            default
        }),
    }
}

//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger snapshot configuration.
    pub ledger: LedgerConfig,
    /// Reporting engine configuration.
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Ledger snapshot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Path of the JSON ledger snapshot served by the engine.
    pub snapshot_path: String,
}

/// Reporting engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Reject malformed period values instead of falling back to the current period.
    #[serde(default)]
    pub strict_periods: bool,
    /// Maximum number of sub-aggregations in flight per report.
    #[serde(default = "default_worker_limit")]
    pub worker_limit: usize,
    /// Number of trailing periods in a sparkline.
    #[serde(default = "default_sparkline_count")]
    pub sparkline_count: usize,
    /// First day of the week for weekly buckets (`sunday` or `monday`).
    #[serde(default = "default_week_start")]
    pub week_start: String,
    /// Step used for sparklines of non-calendar periods (`duration` or `month`).
    #[serde(default = "default_sparkline_fallback")]
    pub sparkline_fallback: String,
    /// Maximum number of cached report results. Zero disables the cache.
    #[serde(default)]
    pub cache_capacity: u64,
    /// Time-to-live for cached report results.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            strict_periods: false,
            worker_limit: default_worker_limit(),
            sparkline_count: default_sparkline_count(),
            week_start: default_week_start(),
            sparkline_fallback: default_sparkline_fallback(),
            cache_capacity: 0,
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_worker_limit() -> usize {
    4
}

fn default_sparkline_count() -> usize {
    6
}

fn default_week_start() -> String {
    "sunday".to_string()
}

fn default_sparkline_fallback() -> String {
    "duration".to_string()
}

fn default_cache_ttl() -> u64 {
    60
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON formatted log lines.
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

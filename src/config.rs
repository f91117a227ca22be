//! Configuration module for feedsync.

use serde::Deserialize;
use std::path::Path;

use crate::{FeedSyncError, Result};

/// Longest discard window accepted, one hundred years.
pub const MAX_DISCARD_AFTER_HOURS: i64 = 24 * 365 * 100;

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/feedsync.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional path to a log file. Console output is always enabled.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Synchronization configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Fraction of a feed's entries that may be invalid before the
    /// channel's run is aborted.
    #[serde(default = "default_error_budget_ratio")]
    pub error_budget_ratio: f64,
    /// Entries published this many hours ago or earlier are discarded.
    #[serde(default = "default_discard_after_hours")]
    pub discard_after_hours: i64,
    /// Maximum number of channels synchronized at the same time.
    #[serde(default = "default_max_concurrent_channels")]
    pub max_concurrent_channels: usize,
}

fn default_error_budget_ratio() -> f64 {
    0.1
}

fn default_discard_after_hours() -> i64 {
    48 // 2 days
}

fn default_max_concurrent_channels() -> usize {
    4
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            error_budget_ratio: default_error_budget_ratio(),
            discard_after_hours: default_discard_after_hours(),
            max_concurrent_channels: default_max_concurrent_channels(),
        }
    }
}

/// Feed fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Allow channels hosted on loopback or private addresses.
    #[serde(default)]
    pub allow_private_hosts: bool,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_user_agent() -> String {
    format!("feedsync/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            user_agent: default_user_agent(),
            allow_private_hosts: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Synchronization configuration.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Feed fetching configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FeedSyncError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FeedSyncError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FEEDSYNC_DATABASE_PATH`: Override the database path
    /// - `FEEDSYNC_LOG_LEVEL`: Override the log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FEEDSYNC_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(level) = std::env::var("FEEDSYNC_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.sync.error_budget_ratio;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(FeedSyncError::Config(format!(
                "sync.error_budget_ratio must be between 0 and 1, got {ratio}"
            )));
        }
        let hours = self.sync.discard_after_hours;
        if !(0..=MAX_DISCARD_AFTER_HOURS).contains(&hours) {
            return Err(FeedSyncError::Config(format!(
                "sync.discard_after_hours must be between 0 and {MAX_DISCARD_AFTER_HOURS}, got {hours}"
            )));
        }
        if self.sync.max_concurrent_channels == 0 {
            return Err(FeedSyncError::Config(
                "sync.max_concurrent_channels must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

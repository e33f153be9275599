use serde::{Deserialize, Serialize};

use super::criteria::{SortKey, StatusFilter};

/// Main configuration structure for agentdeck
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Record store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// Initial list view settings
    #[serde(default)]
    pub view: ViewConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Record store configuration
///
/// Without a `url` the CLI works against an in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Base URL of the REST backend, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,

    /// Anonymous API key sent as `apikey` and bearer token
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Table holding agent rows
    #[serde(default = "default_table")]
    pub table: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Capacity of the change feed buffer before subscribers lag
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

fn default_table() -> String {
    "agents".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

const fn default_feed_capacity() -> usize {
    256
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: default_table(),
            timeout_secs: default_timeout_secs(),
            feed_capacity: default_feed_capacity(),
        }
    }
}

/// Defaults applied when a list view opens
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ViewConfig {
    #[serde(default)]
    pub sort: SortKey,

    #[serde(default)]
    pub status: StatusFilter,
}

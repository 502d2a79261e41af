//! Pyth Hermes price service configuration.

use serde::{Deserialize, Serialize};

use crate::domain::FeedId;

/// Public Hermes endpoint.
pub const HERMES_URL: &str = "https://hermes.pyth.network";

/// ETH/USD price feed.
pub const ETH_USD_FEED: &str = "0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace";

/// Hermes connection settings and the feeds that resolve an epoch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HermesConfig {
    /// Base URL of the Hermes service.
    #[serde(default = "default_hermes_url")]
    pub hermes_url: String,
    /// Feeds whose updates are attached to every resolution.
    #[serde(default = "default_feed_ids")]
    pub feed_ids: Vec<String>,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HermesHttpConfig,
}

fn default_hermes_url() -> String {
    HERMES_URL.to_string()
}

fn default_feed_ids() -> Vec<String> {
    vec![ETH_USD_FEED.to_string()]
}

impl HermesConfig {
    /// Parse the configured feed ids.
    ///
    /// # Errors
    ///
    /// Returns the first id that is not 64 hex digits.
    pub fn feeds(&self) -> Result<Vec<FeedId>, crate::domain::ValidationError> {
        self.feed_ids.iter().map(|raw| raw.parse()).collect()
    }
}

impl Default for HermesConfig {
    fn default() -> Self {
        Self {
            hermes_url: default_hermes_url(),
            feed_ids: default_feed_ids(),
            http: HermesHttpConfig::default(),
        }
    }
}

/// Hermes HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HermesHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between attempts in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    5000
}

const fn default_http_connect_timeout_ms() -> u64 {
    2000
}

const fn default_http_retry_max_attempts() -> u32 {
    2
}

const fn default_http_retry_backoff_ms() -> u64 {
    250
}

impl Default for HermesHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

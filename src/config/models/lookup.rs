//! Upstream balance API configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream balance lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL; the address is appended as the last path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional API key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,
    /// Header the API key is sent in
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retries after the first attempt for retriable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff for 429 responses, scaled by attempt number
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,
    /// Backoff for transport failures, scaled by attempt number
    #[serde(default = "default_network_backoff_ms")]
    pub network_backoff_ms: u64,
    /// Upper bound applied to a server's `Retry-After` on 429 responses
    #[serde(default = "default_max_retry_after_secs")]
    pub max_retry_after_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            api_key_header: default_api_key_header(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            network_backoff_ms: default_network_backoff_ms(),
            max_retry_after_secs: default_max_retry_after_secs(),
        }
    }
}

impl LookupConfig {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

//! Top-level service configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "BALANCE_BATCH_";

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream lookup configuration
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Job limits and defaults
    #[serde(default)]
    pub batch: BatchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Build configuration from defaults overridden by `BALANCE_BATCH_*` variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `BALANCE_BATCH_*` overrides on top of the current values
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(host) = env_var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("PORT")? {
            self.server.port = port;
        }
        if let Some(base_url) = env_var("LOOKUP_BASE_URL") {
            self.lookup.base_url = base_url;
        }
        if let Some(api_key) = env_var("LOOKUP_API_KEY") {
            self.lookup.api_key = Some(api_key);
        }
        if let Some(timeout) = env_parse("LOOKUP_TIMEOUT_SECS")? {
            self.lookup.timeout_secs = timeout;
        }
        if let Some(retries) = env_parse("LOOKUP_MAX_RETRIES")? {
            self.lookup.max_retries = retries;
        }
        if let Some(cap) = env_parse("LOOKUP_MAX_RETRY_AFTER_SECS")? {
            self.lookup.max_retry_after_secs = cap;
        }
        if let Some(rate) = env_parse("DEFAULT_RATE_LIMIT")? {
            self.batch.default_rate_limit = rate;
        }
        if let Some(level) = env_var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = env_parse("LOG_JSON")? {
            self.logging.json = json;
        }
        Ok(())
    }
}

fn env_var(suffix: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, suffix))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(suffix: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(suffix) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            BatchError::config(format!("{}{} is invalid: {}", ENV_PREFIX, suffix, e))
        }),
        None => Ok(None),
    }
}

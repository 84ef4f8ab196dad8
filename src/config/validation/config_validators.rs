//! Configuration section validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::utils::is_valid_http_url;
use tracing::debug;

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating service configuration");

        self.server.validate()?;
        self.lookup.validate()?;
        self.batch.validate()?;
        self.logging.validate()?;

        debug!("Service configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.workers == Some(0) {
            return Err("Server workers must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LookupConfig {
    fn validate(&self) -> Result<(), String> {
        if !is_valid_http_url(&self.base_url) {
            return Err(format!(
                "Lookup base_url must be an http(s) URL, got: {}",
                self.base_url
            ));
        }

        if self.api_key_header.trim().is_empty() {
            return Err("Lookup api_key_header cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Lookup timeout_secs must be greater than 0".to_string());
        }

        if self.max_retries > 10 {
            return Err(format!(
                "Lookup max_retries must be at most 10, got: {}",
                self.max_retries
            ));
        }

        if self.max_retry_after_secs == 0 {
            return Err("Lookup max_retry_after_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_rate_limit == 0 {
            return Err("Batch max_rate_limit must be greater than 0".to_string());
        }

        if self.default_rate_limit == 0 || self.default_rate_limit > self.max_rate_limit {
            return Err(format!(
                "Batch default_rate_limit must be between 1 and {}, got: {}",
                self.max_rate_limit, self.default_rate_limit
            ));
        }

        if self.max_addresses_per_job == 0 {
            return Err("Batch max_addresses_per_job must be greater than 0".to_string());
        }

        if self.event_buffer == 0 {
            return Err("Batch event_buffer must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Logging level cannot be empty".to_string());
        }
        Ok(())
    }
}

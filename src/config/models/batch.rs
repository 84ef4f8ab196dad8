//! Batch job configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Limits and defaults applied to submitted jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Rate limit (calls/second) for jobs that do not set one
    #[serde(default = "default_rate_limit")]
    pub default_rate_limit: u32,
    /// Highest rate limit a job may request
    #[serde(default = "default_max_rate_limit")]
    pub max_rate_limit: u32,
    /// Maximum number of distinct addresses in one job
    #[serde(default = "default_max_addresses_per_job")]
    pub max_addresses_per_job: usize,
    /// Capacity of the progress event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            default_rate_limit: default_rate_limit(),
            max_rate_limit: default_max_rate_limit(),
            max_addresses_per_job: default_max_addresses_per_job(),
            event_buffer: default_event_buffer(),
        }
    }
}

//! Test fixtures and factories
//!
//! Factories build real controllers over the in-memory store, pointed at
//! whatever upstream the test provides.

use balance_batch::config::{BatchConfig, Config, LookupConfig};
use balance_batch::{BalanceLookupClient, InMemoryResultStore, JobController};
use std::sync::Arc;

/// Factory for job controllers
pub struct ControllerFactory;

impl ControllerFactory {
    /// Lookup settings with millisecond backoffs
    pub fn lookup_config(base_url: &str) -> LookupConfig {
        LookupConfig {
            base_url: base_url.to_string(),
            rate_limit_backoff_ms: 5,
            network_backoff_ms: 1,
            timeout_secs: 5,
            ..LookupConfig::default()
        }
    }

    /// Full service configuration targeting `base_url`
    pub fn config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.service.lookup = Self::lookup_config(base_url);
        config
    }

    /// Controller over a fresh in-memory store
    pub fn create(base_url: &str) -> JobController {
        let lookup = BalanceLookupClient::new(&Self::lookup_config(base_url))
            .expect("lookup client should build");
        JobController::new(
            Arc::new(InMemoryResultStore::new()),
            lookup,
            BatchConfig::default(),
        )
    }

    /// Controller whose upstream is unreachable
    pub fn offline() -> JobController {
        Self::create("http://127.0.0.1:9/v1/balances")
    }
}

/// Owned address list from literals
pub fn addresses(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| a.to_string()).collect()
}

//! Configuration data models
//!
//! This module defines all configuration structures used by the service.

#![allow(missing_docs)]

pub mod batch;
pub mod logging;
pub mod lookup;
pub mod server;
pub mod service;

// Re-export all configuration types
pub use batch::*;
pub use logging::*;
pub use lookup::*;
pub use server::*;
pub use service::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default upstream base URL
pub fn default_base_url() -> String {
    "http://127.0.0.1:9000/v1/balances".to_string()
}

/// Default header carrying the upstream API key
pub fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

/// Default upstream request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum retry attempts after the first call
pub fn default_max_retries() -> u32 {
    3
}

/// Base wait before retrying a rate-limited (429) call
pub fn default_rate_limit_backoff_ms() -> u64 {
    1000
}

/// Base wait before retrying after a transport failure
pub fn default_network_backoff_ms() -> u64 {
    500
}

/// Default cap on a server-provided `Retry-After`
pub fn default_max_retry_after_secs() -> u64 {
    60
}

/// Default lookup rate for jobs that do not set one (calls/second)
pub fn default_rate_limit() -> u32 {
    5
}

pub fn default_max_rate_limit() -> u32 {
    100
}

pub fn default_max_addresses_per_job() -> usize {
    10_000
}

pub fn default_event_buffer() -> usize {
    1024
}

pub fn default_log_level() -> String {
    "info".to_string()
}

//! Upstream balance lookups
//!
//! One HTTP GET per address against the configured balance API, with local
//! retry of transient failures. Outcomes are values, never errors.

mod client;
mod retry;
mod types;


pub use client::BalanceLookupClient;
pub use retry::RetryPolicy;
pub use types::{FailureReason, LookupOutcome};

use async_trait::async_trait;

/// Source of balance payloads for single addresses
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceLookup: Send + Sync {
    /// Resolve one address; all failures are reported in the outcome
    async fn fetch(&self, address: &str) -> LookupOutcome;
}

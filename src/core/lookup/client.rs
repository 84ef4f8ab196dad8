//! HTTP client for the upstream balance API

use super::retry::RetryPolicy;
use super::types::{FailureReason, LookupOutcome};
use super::BalanceLookup;
use crate::config::LookupConfig;
use crate::utils::error::{BatchError, Result};
use crate::utils::truncate_string;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Longest upstream body excerpt kept in an error reason
const ERROR_SNIPPET_CHARS: usize = 200;

/// One-address-at-a-time client for the balance API.
///
/// Cloning is cheap; the connection pool is shared between clones.
#[derive(Debug, Clone)]
pub struct BalanceLookupClient {
    client: Client,
    base_url: Url,
    api_key: Option<(HeaderName, HeaderValue)>,
    target_token: Option<String>,
    policy: RetryPolicy,
}

impl BalanceLookupClient {
    /// Create a new client from lookup configuration
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BatchError::config(format!("Invalid lookup base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BatchError::config(format!(
                "Lookup base_url cannot carry a path: {}",
                config.base_url
            )));
        }

        let api_key = match &config.api_key {
            Some(key) => {
                let name = HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(|e| {
                    BatchError::config(format!("Invalid api_key_header: {}", e))
                })?;
                let mut value = HeaderValue::from_str(key)
                    .map_err(|e| BatchError::config(format!("Invalid api_key: {}", e)))?;
                value.set_sensitive(true);
                Some((name, value))
            }
            None => None,
        };

        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("balance-batch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            target_token: None,
            policy: RetryPolicy::from_config(config),
        })
    }

    /// Derive a client for one job run
    pub fn for_job(&self, target_token: Option<String>, floor_delay: Duration) -> Self {
        Self {
            target_token,
            policy: self.policy.clone().with_floor_delay(floor_delay),
            ..self.clone()
        }
    }

    /// Replace the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn target_token(&self) -> Option<&str> {
        self.target_token.as_deref()
    }

    /// Request URL for an address
    pub fn url_for(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(address);
        }
        if let Some(token) = &self.target_token {
            url.query_pairs_mut().append_pair("token", token);
        }
        url
    }

    /// One HTTP round trip, classified
    async fn attempt(&self, url: &Url) -> std::result::Result<serde_json::Value, FailureReason> {
        let mut request = self.client.get(url.clone());
        if let Some((name, value)) = &self.api_key {
            request = request.header(name.clone(), value.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FailureReason::NetworkError {
                message: e.to_string(),
            })?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(FailureReason::RateLimited { retry_after_secs });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FailureReason::NetworkError {
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(FailureReason::HttpError {
                code: status.as_u16(),
                message: truncate_string(body.trim(), ERROR_SNIPPET_CHARS),
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}

#[async_trait]
impl BalanceLookup for BalanceLookupClient {
    async fn fetch(&self, address: &str) -> LookupOutcome {
        let url = self.url_for(address);
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(address = %address, attempt, "Fetching balance");

            let reason = match self.attempt(&url).await {
                Ok(payload) => return LookupOutcome::Success(payload),
                Err(reason) => reason,
            };

            if !reason.is_retryable() {
                debug!(address = %address, attempt, reason = %reason, "Lookup failed");
                return LookupOutcome::Failure(reason);
            }

            if attempt >= max_attempts {
                warn!(address = %address, attempt, reason = %reason, "Retries exhausted");
                return LookupOutcome::Failure(FailureReason::Exhausted {
                    attempts: attempt,
                    last_error: reason.to_string(),
                });
            }

            let delay = match &reason {
                FailureReason::RateLimited { retry_after_secs } => self
                    .policy
                    .rate_limited_delay(attempt, retry_after_secs.map(Duration::from_secs)),
                _ => self.policy.network_delay(attempt),
            };
            warn!(
                address = %address,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason = %reason,
                "Retrying lookup"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

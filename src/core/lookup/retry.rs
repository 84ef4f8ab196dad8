//! Backoff policy for a single address lookup

use crate::config::LookupConfig;
use std::time::Duration;

/// Retry budget and backoff constants for one lookup.
///
/// A 429 waits `max(floor_delay, rate_limit_backoff) * attempt`, stretched to
/// the server's `Retry-After` (capped at `max_retry_after`) when that is
/// longer. A transport failure waits `network_backoff * attempt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub rate_limit_backoff: Duration,
    pub network_backoff: Duration,
    /// Lower bound for 429 backoff, normally the job's gate interval
    pub floor_delay: Duration,
    /// Ceiling for a server-provided `Retry-After`
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&LookupConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &LookupConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            rate_limit_backoff: Duration::from_millis(config.rate_limit_backoff_ms),
            network_backoff: Duration::from_millis(config.network_backoff_ms),
            floor_delay: Duration::ZERO,
            max_retry_after: Duration::from_secs(config.max_retry_after_secs),
        }
    }

    pub fn with_floor_delay(mut self, floor_delay: Duration) -> Self {
        self.floor_delay = floor_delay;
        self
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Wait before retrying after the `attempt`-th call was rate limited
    pub fn rate_limited_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let computed = self.floor_delay.max(self.rate_limit_backoff) * attempt.max(1);
        match retry_after {
            Some(server_delay) => computed.max(server_delay.min(self.max_retry_after)),
            None => computed,
        }
    }

    /// Wait before retrying after the `attempt`-th call failed in transport
    pub fn network_delay(&self, attempt: u32) -> Duration {
        self.network_backoff * attempt.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            rate_limit_backoff: Duration::from_millis(1000),
            network_backoff: Duration::from_millis(500),
            floor_delay: Duration::ZERO,
            max_retry_after: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_rate_limited_delay_scales_with_attempt() {
        let policy = policy();
        assert_eq!(policy.rate_limited_delay(1, None), Duration::from_millis(1000));
        assert_eq!(policy.rate_limited_delay(3, None), Duration::from_millis(3000));
    }

    #[test]
    fn test_rate_limited_delay_uses_larger_of_floor_and_base() {
        let policy = policy().with_floor_delay(Duration::from_millis(1500));
        assert_eq!(policy.rate_limited_delay(2, None), Duration::from_millis(3000));

        let policy = RetryPolicy {
            floor_delay: Duration::from_millis(200),
            ..policy
        };
        assert_eq!(policy.rate_limited_delay(2, None), Duration::from_millis(2000));
    }

    #[test]
    fn test_rate_limited_delay_honours_longer_retry_after() {
        let policy = policy();
        assert_eq!(
            policy.rate_limited_delay(1, Some(Duration::from_secs(5))),
            Duration::from_secs(5)
        );
        assert_eq!(
            policy.rate_limited_delay(2, Some(Duration::from_millis(10))),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_retry_after_is_capped() {
        let policy = policy();
        let year = Duration::from_secs(365 * 24 * 60 * 60);
        assert_eq!(
            policy.rate_limited_delay(1, Some(year)),
            Duration::from_secs(60)
        );

        // The computed backoff is never shortened by the cap
        let policy = RetryPolicy {
            rate_limit_backoff: Duration::from_secs(50),
            max_retry_after: Duration::from_secs(10),
            ..policy
        };
        assert_eq!(
            policy.rate_limited_delay(2, Some(year)),
            Duration::from_secs(100)
        );
    }

    #[test]
    fn test_network_delay_is_smaller_fixed_backoff() {
        let policy = policy();
        assert_eq!(policy.network_delay(1), Duration::from_millis(500));
        assert_eq!(policy.network_delay(2), Duration::from_millis(1000));
        assert!(policy.network_delay(1) < policy.rate_limited_delay(1, None));
    }

    #[test]
    fn test_default_policy_matches_config_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.max_retry_after, Duration::from_secs(60));
    }
}

//! Lookup outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a lookup did not produce a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Upstream answered 429
    RateLimited { retry_after_secs: Option<u64> },
    /// Upstream answered a non-2xx status other than 429
    HttpError { code: u16, message: String },
    /// The request never produced a response
    NetworkError { message: String },
    /// Retriable failures consumed the whole retry budget
    Exhausted { attempts: u32, last_error: String },
}

impl FailureReason {
    /// Transient failures are retried inside the client
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureReason::RateLimited { .. } | FailureReason::NetworkError { .. }
        )
    }

    /// HTTP status associated with the failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FailureReason::RateLimited { .. } => Some(429),
            FailureReason::HttpError { code, .. } => Some(*code),
            FailureReason::NetworkError { .. } | FailureReason::Exhausted { .. } => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::RateLimited {
                retry_after_secs: Some(secs),
            } => write!(f, "rate limited by upstream (HTTP 429, retry after {}s)", secs),
            FailureReason::RateLimited {
                retry_after_secs: None,
            } => write!(f, "rate limited by upstream (HTTP 429)"),
            FailureReason::HttpError { code, message } if message.is_empty() => {
                write!(f, "HTTP {}", code)
            }
            FailureReason::HttpError { code, message } => write!(f, "HTTP {}: {}", code, message),
            FailureReason::NetworkError { message } => write!(f, "network error: {}", message),
            FailureReason::Exhausted {
                attempts,
                last_error,
            } => write!(
                f,
                "retries exhausted after {} attempts: {}",
                attempts, last_error
            ),
        }
    }
}

/// Normalized result of one address lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Upstream body, stored verbatim
    Success(serde_json::Value),
    Failure(FailureReason),
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_display() {
        let reason = FailureReason::HttpError {
            code: 500,
            message: "internal".to_string(),
        };
        assert_eq!(reason.to_string(), "HTTP 500: internal");

        let reason = FailureReason::HttpError {
            code: 404,
            message: String::new(),
        };
        assert_eq!(reason.to_string(), "HTTP 404");

        let reason = FailureReason::Exhausted {
            attempts: 4,
            last_error: "network error: connection refused".to_string(),
        };
        assert_eq!(
            reason.to_string(),
            "retries exhausted after 4 attempts: network error: connection refused"
        );
    }

    #[test]
    fn test_failure_reason_retryability() {
        assert!(
            FailureReason::RateLimited {
                retry_after_secs: None
            }
            .is_retryable()
        );
        assert!(
            FailureReason::NetworkError {
                message: "reset".to_string()
            }
            .is_retryable()
        );
        assert!(
            !FailureReason::HttpError {
                code: 404,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !FailureReason::Exhausted {
                attempts: 4,
                last_error: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_failure_reason_serialization() {
        let reason = FailureReason::HttpError {
            code: 503,
            message: "maintenance".to_string(),
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["kind"], "http_error");
        assert_eq!(json["code"], 503);
        assert_eq!(reason.status_code(), Some(503));
    }
}

//! Request types for the job service

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parameters for a new job; unset fields take configured defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewJob {
    #[serde(default)]
    pub name: Option<String>,
    /// Calls per second
    #[serde(default)]
    pub rate_limit: Option<u32>,
    #[serde(default)]
    pub target_token: Option<String>,
}

/// Terminal outcome reported by an external caller for one address
#[derive(Debug, Clone, PartialEq)]
pub enum ReportedOutcome {
    Success { payload: serde_json::Value },
    Failed { error: String },
}

/// Trim addresses, drop blanks and keep the first occurrence of duplicates
pub fn normalize_addresses<I, S>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .filter_map(|address| {
            let address = address.as_ref().trim();
            (!address.is_empty() && seen.insert(address.to_string())).then(|| address.to_string())
        })
        .collect()
}

/// Collapse blank optional strings to `None`
pub(super) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Batch job types and data structures

use crate::utils::error::{BatchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job processing status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, address rows may not exist yet
    Pending,
    /// A run (or caller-driven submissions) is in progress
    Processing,
    /// Every address reached a terminal status
    Completed,
    /// The run aborted before finishing the address list
    Failed,
}

impl JobStatus {
    /// Whether no further transitions are allowed
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }

    /// Forward-only: pending -> processing -> {completed, failed}
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next.rank() >= self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-address processing status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AddressStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl AddressStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AddressStatus::Success | AddressStatus::Failed)
    }

    /// pending -> processing -> (success | failed); terminal rows never change
    pub fn can_transition_to(self, next: AddressStatus) -> bool {
        match self {
            AddressStatus::Pending => true,
            AddressStatus::Processing => next != AddressStatus::Pending,
            AddressStatus::Success | AddressStatus::Failed => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AddressStatus::Pending => "pending",
            AddressStatus::Processing => "processing",
            AddressStatus::Success => "success",
            AddressStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for AddressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for creating a job in the result store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSpec {
    /// Optional display name
    pub name: Option<String>,
    /// Lookup ceiling in calls per second
    pub rate_limit: u32,
    /// Only report holdings of this token, when set
    pub target_token: Option<String>,
}

/// One batch request covering a fixed address list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: String,
    pub name: Option<String>,
    pub total_addresses: usize,
    pub processed_addresses: usize,
    pub successful_lookups: usize,
    pub failed_lookups: usize,
    pub status: JobStatus,
    /// Calls per second
    pub rate_limit: u32,
    pub target_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Build a fresh pending job
    pub fn new(id: String, spec: JobSpec) -> Self {
        Self {
            id,
            name: spec.name,
            total_addresses: 0,
            processed_addresses: 0,
            successful_lookups: 0,
            failed_lookups: 0,
            status: JobStatus::Pending,
            rate_limit: spec.rate_limit,
            target_token: spec.target_token,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Counters as a value
    pub fn counters(&self) -> JobCounters {
        JobCounters {
            processed: self.processed_addresses,
            succeeded: self.successful_lookups,
            failed: self.failed_lookups,
        }
    }

    /// Produce the job that results from applying `update`.
    ///
    /// Rejects backward status moves, any mutation of a terminal job,
    /// shrinking counters and counter sets that break
    /// `processed == succeeded + failed <= total`. Terminal transitions
    /// without an explicit completion time are stamped with now.
    pub fn apply(&self, update: &JobUpdate) -> Result<Job> {
        if self.status.is_terminal() {
            return Err(BatchError::invalid_transition(format!(
                "job {} is already {}",
                self.id, self.status
            )));
        }

        let mut next = self.clone();

        if let Some(status) = update.status {
            if !self.status.can_transition_to(status) {
                return Err(BatchError::invalid_transition(format!(
                    "job {} cannot move from {} to {}",
                    self.id, self.status, status
                )));
            }
            next.status = status;
        }
        if let Some(total) = update.total_addresses {
            next.total_addresses = total;
        }
        if let Some(counters) = update.counters {
            if counters.processed < self.processed_addresses
                || counters.succeeded < self.successful_lookups
                || counters.failed < self.failed_lookups
            {
                return Err(BatchError::invalid_transition(format!(
                    "job {} counters cannot decrease",
                    self.id
                )));
            }
            next.processed_addresses = counters.processed;
            next.successful_lookups = counters.succeeded;
            next.failed_lookups = counters.failed;
        }
        if let Some(completed_at) = update.completed_at {
            next.completed_at = Some(completed_at);
        }

        if next.status.is_terminal() && next.completed_at.is_none() {
            next.completed_at = Some(Utc::now());
        }
        if !next.status.is_terminal() && next.completed_at.is_some() {
            return Err(BatchError::validation(format!(
                "job {} cannot have a completion time while {}",
                self.id, next.status
            )));
        }
        if next.processed_addresses != next.successful_lookups + next.failed_lookups {
            return Err(BatchError::invalid_transition(format!(
                "job {} counters out of balance: processed {} != {} + {}",
                self.id, next.processed_addresses, next.successful_lookups, next.failed_lookups
            )));
        }
        if next.processed_addresses > next.total_addresses {
            return Err(BatchError::invalid_transition(format!(
                "job {} processed {} of only {} addresses",
                self.id, next.processed_addresses, next.total_addresses
            )));
        }

        Ok(next)
    }
}

/// Processed/success/failure counters of a job
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobCounters {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl JobCounters {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
        self.processed += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.processed += 1;
    }

    /// Count terminal rows
    pub fn from_results(results: &[AddressResult]) -> Self {
        let mut counters = Self::default();
        for result in results {
            match result.status {
                AddressStatus::Success => counters.record_success(),
                AddressStatus::Failed => counters.record_failure(),
                AddressStatus::Pending | AddressStatus::Processing => {}
            }
        }
        counters
    }
}

/// Partial job update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub total_addresses: Option<usize>,
    pub counters: Option<JobCounters>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn counters(counters: JobCounters) -> Self {
        Self {
            counters: Some(counters),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total_addresses = Some(total);
        self
    }

    pub fn with_counters(mut self, counters: JobCounters) -> Self {
        self.counters = Some(counters);
        self
    }

    pub fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }
}

/// Per-address outcome record within a job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressResult {
    pub id: String,
    pub job_id: String,
    pub address: String,
    pub status: AddressStatus,
    /// Upstream response body, present iff `status == success`
    pub payload: Option<serde_json::Value>,
    /// Human-readable reason, present iff `status == failed`
    pub error_message: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl AddressResult {
    pub fn new(id: String, job_id: String, address: String) -> Self {
        Self {
            id,
            job_id,
            address,
            status: AddressStatus::Pending,
            payload: None,
            error_message: None,
            processed_at: None,
        }
    }

    /// Produce the row that results from applying `update`.
    ///
    /// Terminal rows are immutable; payload must accompany success and
    /// only success, error message must accompany failure and only failure.
    pub fn apply(&self, update: &AddressResultUpdate) -> Result<AddressResult> {
        if self.status.is_terminal() {
            return Err(BatchError::invalid_transition(format!(
                "address {} in job {} is already {}",
                self.address, self.job_id, self.status
            )));
        }

        let mut next = self.clone();

        if let Some(status) = update.status {
            if !self.status.can_transition_to(status) {
                return Err(BatchError::invalid_transition(format!(
                    "address {} cannot move from {} to {}",
                    self.address, self.status, status
                )));
            }
            next.status = status;
        }
        if let Some(payload) = &update.payload {
            next.payload = payload.clone();
        }
        if let Some(error_message) = &update.error_message {
            next.error_message = error_message.clone();
        }
        if let Some(processed_at) = update.processed_at {
            next.processed_at = Some(processed_at);
        }

        let payload_ok = next.payload.is_some() == (next.status == AddressStatus::Success);
        let error_ok = next.error_message.is_some() == (next.status == AddressStatus::Failed);
        if !payload_ok || !error_ok {
            return Err(BatchError::validation(format!(
                "address {} is {} but payload/error fields do not match",
                self.address, next.status
            )));
        }

        Ok(next)
    }
}

/// Partial address result update.
///
/// `payload` and `error_message` are doubly optional: outer `None` leaves the
/// field alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressResultUpdate {
    pub status: Option<AddressStatus>,
    pub payload: Option<Option<serde_json::Value>>,
    pub error_message: Option<Option<String>>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl AddressResultUpdate {
    pub fn processing() -> Self {
        Self {
            status: Some(AddressStatus::Processing),
            payload: Some(None),
            error_message: Some(None),
            processed_at: Some(Utc::now()),
        }
    }

    pub fn success(payload: serde_json::Value) -> Self {
        Self {
            status: Some(AddressStatus::Success),
            payload: Some(Some(payload)),
            error_message: Some(None),
            processed_at: Some(Utc::now()),
        }
    }

    pub fn failed<S: Into<String>>(reason: S) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = "unknown error".to_string();
        }
        Self {
            status: Some(AddressStatus::Failed),
            payload: Some(None),
            error_message: Some(Some(reason)),
            processed_at: Some(Utc::now()),
        }
    }
}

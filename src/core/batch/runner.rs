//! Sequential job runner
//!
//! Drives one job through `pending -> processing -> completed`, one address
//! at a time in input order. Every lookup passes through the job's
//! [`RateGate`] and every intermediate state is written to the store before
//! the next address starts.

use super::events::{ProgressEvent, ProgressSink};
use super::types::{AddressResultUpdate, AddressStatus, JobCounters, JobStatus, JobUpdate};
use crate::core::lookup::{BalanceLookup, LookupOutcome};
use crate::core::rate_limiter::RateGate;
use crate::storage::{ResultOrder, ResultStore};
use crate::utils::error::{BatchError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub job_id: String,
    pub total: usize,
    pub counters: JobCounters,
    pub elapsed: Duration,
}

/// Runs the address list of a single job
pub struct BatchRunner {
    store: Arc<dyn ResultStore>,
    lookup: Arc<dyn BalanceLookup>,
    gate: Arc<RateGate>,
    events: Option<ProgressSink>,
}

impl BatchRunner {
    pub fn new(
        store: Arc<dyn ResultStore>,
        lookup: Arc<dyn BalanceLookup>,
        gate: Arc<RateGate>,
    ) -> Self {
        Self {
            store,
            lookup,
            gate,
            events: None,
        }
    }

    /// Publish progress to `sink` while running
    pub fn with_events(mut self, sink: ProgressSink) -> Self {
        self.events = Some(sink);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sink) = &self.events {
            sink.emit(event);
        }
    }

    /// Process `addresses` for `job_id` to completion.
    ///
    /// Address-level failures, including store faults while writing one
    /// address, are recorded and counted. An `Err` means the run itself
    /// could not start or finish and the job should be marked failed.
    pub async fn run(&self, job_id: &str, addresses: &[String]) -> Result<RunSummary> {
        let started = Instant::now();
        let total = addresses.len();

        self.store
            .update_job(
                job_id,
                JobUpdate::status(JobStatus::Processing).with_total(total),
            )
            .await?
            .ok_or_else(|| BatchError::not_found(format!("job {}", job_id)))?;

        let mut rows: HashMap<String, String> = self
            .store
            .list_address_results(job_id, ResultOrder::Inserted)
            .await?
            .into_iter()
            .map(|row| (row.address, row.id))
            .collect();

        info!(
            job_id = %job_id,
            total,
            interval_ms = self.gate.interval().as_millis() as u64,
            "Job run started"
        );
        self.emit(ProgressEvent::RunStarted {
            job_id: job_id.to_string(),
            total,
        });

        let mut counters = JobCounters::default();

        for (index, address) in addresses.iter().enumerate() {
            let row_id = match rows.remove(address) {
                Some(id) => Some(id),
                None => match self.store.create_address_result(job_id, address).await {
                    Ok(row) => Some(row.id),
                    Err(e) => {
                        warn!(job_id = %job_id, address = %address, error = %e, "Failed to create address row");
                        None
                    }
                },
            };

            let (status, reason) = match &row_id {
                Some(row_id) => match self.process_address(row_id, address).await {
                    Ok(None) => (AddressStatus::Success, None),
                    Ok(Some(reason)) => (AddressStatus::Failed, Some(reason)),
                    Err(e) => {
                        warn!(job_id = %job_id, address = %address, error = %e, "Store fault while processing address");
                        let reason = format!("store error: {}", e);
                        if let Err(e) = self
                            .store
                            .update_address_result(row_id, AddressResultUpdate::failed(&reason))
                            .await
                        {
                            debug!(job_id = %job_id, address = %address, error = %e, "Could not mark address failed");
                        }
                        (AddressStatus::Failed, Some(reason))
                    }
                },
                None => (
                    AddressStatus::Failed,
                    Some("store error: address row unavailable".to_string()),
                ),
            };

            match status {
                AddressStatus::Success => counters.record_success(),
                _ => counters.record_failure(),
            }

            if let Err(e) = self
                .store
                .update_job(job_id, JobUpdate::counters(counters))
                .await
            {
                warn!(job_id = %job_id, error = %e, "Failed to persist job counters");
            }

            debug!(
                job_id = %job_id,
                address = %address,
                status = %status,
                processed = counters.processed,
                "Address processed"
            );
            self.emit(ProgressEvent::AddressProcessed {
                job_id: job_id.to_string(),
                address_index: index,
                address: address.clone(),
                status,
                reason,
            });
        }

        self.store
            .update_job(
                job_id,
                JobUpdate::status(JobStatus::Completed)
                    .with_counters(counters)
                    .with_completed_at(Utc::now()),
            )
            .await?
            .ok_or_else(|| BatchError::not_found(format!("job {}", job_id)))?;

        let elapsed = started.elapsed();
        info!(
            job_id = %job_id,
            total,
            succeeded = counters.succeeded,
            failed = counters.failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Job run completed"
        );
        self.emit(ProgressEvent::RunFinished {
            job_id: job_id.to_string(),
            status: JobStatus::Completed,
            counters,
        });

        Ok(RunSummary {
            job_id: job_id.to_string(),
            total,
            counters,
            elapsed,
        })
    }

    /// Look up one address and write its terminal row.
    ///
    /// Returns the failure reason for failed lookups, `None` on success.
    async fn process_address(&self, row_id: &str, address: &str) -> Result<Option<String>> {
        self.store
            .update_address_result(row_id, AddressResultUpdate::processing())
            .await?
            .ok_or_else(|| BatchError::not_found(format!("address result {}", row_id)))?;

        self.gate.acquire().await;

        let (update, reason) = match self.lookup.fetch(address).await {
            LookupOutcome::Success(payload) => (AddressResultUpdate::success(payload), None),
            LookupOutcome::Failure(reason) => {
                let reason = reason.to_string();
                (AddressResultUpdate::failed(&reason), Some(reason))
            }
        };

        self.store
            .update_address_result(row_id, update)
            .await?
            .ok_or_else(|| BatchError::not_found(format!("address result {}", row_id)))?;

        Ok(reason)
    }
}

//! Caller-reported outcomes
//!
//! Lets an external caller perform the lookups itself and report each
//! terminal outcome. The same state machine and counters apply as for
//! background runs.

use super::controller::JobController;
use super::types::ReportedOutcome;
use crate::core::batch::{
    AddressResult, AddressResultUpdate, JobCounters, JobStatus, JobUpdate,
    ProgressEvent,
};
use crate::storage::ResultOrder;
use crate::utils::error::{BatchError, Result};
use chrono::Utc;
use tracing::{debug, info};

impl JobController {
    /// Record the outcome of one address of a prepared job.
    ///
    /// The first submission moves the job to processing; the submission that
    /// leaves no non-terminal row completes it. Jobs with a background run in
    /// flight and rows already terminal are rejected.
    pub async fn submit_result(
        &self,
        job_id: &str,
        address: &str,
        outcome: ReportedOutcome,
    ) -> Result<AddressResult> {
        self.get_job(job_id).await?;
        let lock = self.job_lock(job_id);
        let _guard = lock.lock().await;

        if self.is_running(job_id) {
            return Err(BatchError::invalid_transition(format!(
                "job {} is being processed by a background run",
                job_id
            )));
        }
        let job = self.get_job(job_id).await?;
        if job.status.is_terminal() {
            return Err(BatchError::invalid_transition(format!(
                "job {} is already {}",
                job.id, job.status
            )));
        }

        let address = address.trim();
        let row = self
            .store
            .find_address_result(job_id, address)
            .await?
            .ok_or_else(|| {
                BatchError::not_found(format!("Address {} is not part of job {}", address, job_id))
            })?;
        if row.status.is_terminal() {
            return Err(BatchError::invalid_transition(format!(
                "address {} in job {} is already {}",
                address, job_id, row.status
            )));
        }

        if job.status == JobStatus::Pending {
            self.store
                .update_job(job_id, JobUpdate::status(JobStatus::Processing))
                .await?;
            self.events.emit(ProgressEvent::RunStarted {
                job_id: job.id.clone(),
                total: job.total_addresses,
            });
            info!(job_id = %job.id, "Caller-driven processing started");
        }

        let (update, reason) = match outcome {
            ReportedOutcome::Success { payload } => (AddressResultUpdate::success(payload), None),
            ReportedOutcome::Failed { error } => {
                let update = AddressResultUpdate::failed(error);
                let reason = update.error_message.clone().flatten();
                (update, reason)
            }
        };
        let row = self
            .store
            .update_address_result(&row.id, update)
            .await?
            .ok_or_else(|| BatchError::not_found(format!("Address result {}", row.id)))?;

        let rows = self
            .store
            .list_address_results(job_id, ResultOrder::Inserted)
            .await?;
        let counters = JobCounters::from_results(&rows);
        let address_index = rows.iter().position(|r| r.id == row.id).unwrap_or_default();

        let mut update = JobUpdate::counters(counters);
        let finished = rows.iter().all(|r| r.status.is_terminal());
        if finished {
            update = update
                .with_status(JobStatus::Completed)
                .with_completed_at(Utc::now());
        }
        let job = self
            .store
            .update_job(job_id, update)
            .await?
            .ok_or_else(|| BatchError::not_found(format!("Job not found: {}", job_id)))?;

        debug!(job_id = %job.id, address = %row.address, status = %row.status, "Outcome recorded");
        self.events.emit(ProgressEvent::AddressProcessed {
            job_id: job.id.clone(),
            address_index,
            address: row.address.clone(),
            status: row.status,
            reason,
        });
        if finished {
            self.release_job_lock(job_id);
            info!(
                job_id = %job.id,
                succeeded = counters.succeeded,
                failed = counters.failed,
                "Caller-driven job completed"
            );
            self.events.emit(ProgressEvent::RunFinished {
                job_id: job.id.clone(),
                status: job.status,
                counters,
            });
        }

        Ok(row)
    }
}

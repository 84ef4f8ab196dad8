//! Job controller implementation

use super::export::{ExportFormat, render_results};
use super::types::{NewJob, non_blank, normalize_addresses};
use crate::config::{BatchConfig, Config};
use crate::core::batch::{
    AddressResult, BatchRunner, Job, JobSpec, JobStatus, JobUpdate, ProgressEvent, ProgressSink,
};
use crate::core::lookup::BalanceLookupClient;
use crate::core::rate_limiter::RateGate;
use crate::storage::{InMemoryResultStore, ResultOrder, ResultStore};
use crate::utils::error::{BatchError, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Entry point for creating, running and reading batch jobs
pub struct JobController {
    pub(super) store: Arc<dyn ResultStore>,
    /// Template cloned per run with the job's token and gate interval
    pub(super) lookup: BalanceLookupClient,
    pub(super) batch: BatchConfig,
    pub(super) events: ProgressSink,
    /// Jobs with a background run in flight
    pub(super) active: Arc<Mutex<HashSet<String>>>,
    /// Per-job locks serializing address intake and caller-reported outcomes
    pub(super) intake: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl JobController {
    pub fn new(
        store: Arc<dyn ResultStore>,
        lookup: BalanceLookupClient,
        batch: BatchConfig,
    ) -> Self {
        let events = ProgressSink::new(batch.event_buffer);
        Self {
            store,
            lookup,
            batch,
            events,
            active: Arc::new(Mutex::new(HashSet::new())),
            intake: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Build a controller over an in-memory store
    pub fn from_config(config: &Config) -> Result<Self> {
        let lookup = BalanceLookupClient::new(config.lookup())?;
        Ok(Self::new(
            Arc::new(InMemoryResultStore::new()),
            lookup,
            config.batch().clone(),
        ))
    }

    /// Observe progress of every job run
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.events.subscribe()
    }

    /// Whether a background run is in flight for `job_id`
    pub fn is_running(&self, job_id: &str) -> bool {
        self.active.lock().contains(job_id)
    }

    /// Number of background runs in flight
    pub fn active_job_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Create a pending job
    pub async fn create_job(&self, new_job: NewJob) -> Result<Job> {
        let rate_limit = new_job
            .rate_limit
            .unwrap_or(self.batch.default_rate_limit);
        if rate_limit == 0 || rate_limit > self.batch.max_rate_limit {
            return Err(BatchError::validation(format!(
                "rate_limit must be between 1 and {}, got {}",
                self.batch.max_rate_limit, rate_limit
            )));
        }

        let job = self
            .store
            .create_job(JobSpec {
                name: non_blank(new_job.name),
                rate_limit,
                target_token: non_blank(new_job.target_token),
            })
            .await?;

        info!(job_id = %job.id, rate_limit, "Job created");
        Ok(job)
    }

    /// Intake lock of one existing job; other jobs are never blocked by it
    pub(super) fn job_lock(&self, job_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.intake
            .lock()
            .entry(job_id.to_string())
            .or_default()
            .clone()
    }

    /// Forget the intake lock of a job that reached a terminal state
    pub(super) fn release_job_lock(&self, job_id: &str) {
        self.intake.lock().remove(job_id);
    }

    /// Attach addresses to a pending job and run it in the background
    pub async fn start_job(&self, job_id: &str, addresses: Vec<String>) -> Result<Job> {
        self.get_job(job_id).await?;
        let lock = self.job_lock(job_id);
        let _guard = lock.lock().await;
        let (job, addresses) = self.attach_addresses(job_id, addresses).await?;
        self.spawn_run(job.clone(), addresses);
        Ok(job)
    }

    /// Create a job and start it
    pub async fn submit(&self, new_job: NewJob, addresses: Vec<String>) -> Result<Job> {
        let addresses = self.checked_addresses(addresses)?;
        let job = self.create_job(new_job).await?;
        self.start_job(&job.id, addresses).await
    }

    /// Attach addresses to a pending job without running it.
    ///
    /// The job is then completed through
    /// [`submit_result`](Self::submit_result) calls.
    pub async fn prepare_job(&self, job_id: &str, addresses: Vec<String>) -> Result<Job> {
        self.get_job(job_id).await?;
        let lock = self.job_lock(job_id);
        let _guard = lock.lock().await;
        let (job, _) = self.attach_addresses(job_id, addresses).await?;
        Ok(job)
    }

    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| BatchError::not_found(format!("Job not found: {}", job_id)))
    }

    /// All jobs, newest first
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.store.list_jobs().await
    }

    pub async fn list_results(&self, job_id: &str, order: ResultOrder) -> Result<Vec<AddressResult>> {
        self.get_job(job_id).await?;
        self.store.list_address_results(job_id, order).await
    }

    /// Render the job's rows in submission order
    pub async fn export(&self, job_id: &str, format: ExportFormat) -> Result<String> {
        let rows = self.list_results(job_id, ResultOrder::Inserted).await?;
        render_results(format, &rows)
    }

    fn checked_addresses(&self, addresses: Vec<String>) -> Result<Vec<String>> {
        let addresses = normalize_addresses(addresses);
        if addresses.is_empty() {
            return Err(BatchError::validation("at least one address is required"));
        }
        if addresses.len() > self.batch.max_addresses_per_job {
            return Err(BatchError::validation(format!(
                "too many addresses: {} (max {})",
                addresses.len(),
                self.batch.max_addresses_per_job
            )));
        }
        Ok(addresses)
    }

    /// Create the address rows of a pending job and record its total.
    ///
    /// Callers hold the job's intake lock.
    async fn attach_addresses(
        &self,
        job_id: &str,
        addresses: Vec<String>,
    ) -> Result<(Job, Vec<String>)> {
        let addresses = self.checked_addresses(addresses)?;

        let job = self.get_job(job_id).await?;
        if job.status != JobStatus::Pending {
            return Err(BatchError::invalid_transition(format!(
                "job {} is {} and cannot accept addresses",
                job.id, job.status
            )));
        }
        let existing = self
            .store
            .list_address_results(job_id, ResultOrder::Inserted)
            .await?;
        if !existing.is_empty() {
            return Err(BatchError::invalid_transition(format!(
                "job {} already has {} addresses",
                job.id,
                existing.len()
            )));
        }

        for address in &addresses {
            self.store.create_address_result(job_id, address).await?;
        }
        let job = self
            .store
            .update_job(job_id, JobUpdate::default().with_total(addresses.len()))
            .await?
            .ok_or_else(|| BatchError::not_found(format!("Job not found: {}", job_id)))?;

        info!(job_id = %job.id, total = addresses.len(), "Addresses attached");
        Ok((job, addresses))
    }

    /// Run a job on a background task.
    ///
    /// A supervising task marks the job failed when the run returns an error
    /// or panics.
    fn spawn_run(&self, job: Job, addresses: Vec<String>) {
        let gate = Arc::new(RateGate::new(job.rate_limit));
        let lookup = Arc::new(
            self.lookup
                .for_job(job.target_token.clone(), gate.interval()),
        );
        let runner = BatchRunner::new(self.store.clone(), lookup, gate)
            .with_events(self.events.clone());

        self.active.lock().insert(job.id.clone());

        let job_id = job.id;
        let run_job_id = job_id.clone();
        let run = tokio::spawn(async move { runner.run(&run_job_id, &addresses).await });

        let store = self.store.clone();
        let events = self.events.clone();
        let active = self.active.clone();
        let intake = self.intake.clone();
        tokio::spawn(async move {
            let failure = match run.await {
                Ok(Ok(_)) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) => Some(format!("run task aborted: {}", e)),
            };
            if let Some(reason) = failure {
                error!(job_id = %job_id, reason = %reason, "Job run failed");
                mark_failed(store.as_ref(), &events, &job_id).await;
            }
            active.lock().remove(&job_id);
            intake.lock().remove(&job_id);
        });
    }
}

async fn mark_failed(store: &dyn ResultStore, events: &ProgressSink, job_id: &str) {
    match store
        .update_job(job_id, JobUpdate::status(JobStatus::Failed))
        .await
    {
        Ok(Some(job)) => events.emit(ProgressEvent::RunFinished {
            job_id: job.id.clone(),
            status: job.status,
            counters: job.counters(),
        }),
        Ok(None) => warn!(job_id = %job_id, "Job vanished before it could be marked failed"),
        Err(e) => warn!(job_id = %job_id, error = %e, "Could not mark job failed"),
    }
}

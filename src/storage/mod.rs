//! Storage layer for batch jobs
//!
//! The [`ResultStore`] trait is the persistence boundary for jobs and their
//! per-address results. Every state the runner passes through is written
//! here as it happens, so pollers only ever read from the store.

pub mod memory;

pub use memory::InMemoryResultStore;

use crate::core::batch::{AddressResult, AddressResultUpdate, Job, JobSpec, JobUpdate};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ordering of address results in listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrder {
    /// Order the addresses were submitted in
    #[default]
    Inserted,
    /// Order the addresses were last touched by the runner; untouched rows last
    Processed,
}

/// Persistence boundary for jobs and address results.
///
/// Implementations enforce the state machine: status changes only move
/// forward, terminal rows and jobs are immutable, and job counters keep
/// `processed == successful + failed <= total`.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert a new pending job
    async fn create_job(&self, spec: JobSpec) -> Result<Job>;

    async fn get_job(&self, id: &str) -> Result<Option<Job>>;

    /// All jobs, newest first
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// Apply a partial update; `Ok(None)` when the job does not exist
    async fn update_job(&self, id: &str, update: JobUpdate) -> Result<Option<Job>>;

    /// Insert a pending row for `address`; rejects duplicates within a job
    async fn create_address_result(&self, job_id: &str, address: &str) -> Result<AddressResult>;

    async fn list_address_results(
        &self,
        job_id: &str,
        order: ResultOrder,
    ) -> Result<Vec<AddressResult>>;

    async fn find_address_result(
        &self,
        job_id: &str,
        address: &str,
    ) -> Result<Option<AddressResult>>;

    /// Apply a partial update; `Ok(None)` when the row does not exist
    async fn update_address_result(
        &self,
        id: &str,
        update: AddressResultUpdate,
    ) -> Result<Option<AddressResult>>;
}

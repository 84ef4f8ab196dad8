//! In-process result store

use super::{ResultOrder, ResultStore};
use crate::core::batch::{AddressResult, AddressResultUpdate, Job, JobSpec, JobUpdate};
use crate::utils::error::{BatchError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    jobs: HashMap<String, Job>,
    /// Job ids in creation order
    job_order: Vec<String>,
    results: HashMap<String, AddressResult>,
    /// Row ids per job in insertion order
    job_results: HashMap<String, Vec<String>>,
    /// (job id, address) -> row id
    by_address: HashMap<(String, String), String>,
}

/// Result store kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    inner: RwLock<Inner>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs held
    pub fn job_count(&self) -> usize {
        self.inner.read().jobs.len()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn create_job(&self, spec: JobSpec) -> Result<Job> {
        let job = Job::new(Uuid::new_v4().to_string(), spec);
        let mut inner = self.inner.write();
        inner.job_order.push(job.id.clone());
        inner.job_results.insert(job.id.clone(), Vec::new());
        inner.jobs.insert(job.id.clone(), job.clone());
        debug!(job_id = %job.id, "Job stored");
        Ok(job)
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        Ok(self.inner.read().jobs.get(id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>> {
        let inner = self.inner.read();
        Ok(inner
            .job_order
            .iter()
            .rev()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect())
    }

    async fn update_job(&self, id: &str, update: JobUpdate) -> Result<Option<Job>> {
        let mut inner = self.inner.write();
        let Some(current) = inner.jobs.get(id) else {
            return Ok(None);
        };
        let next = current.apply(&update)?;
        inner.jobs.insert(id.to_string(), next.clone());
        Ok(Some(next))
    }

    async fn create_address_result(&self, job_id: &str, address: &str) -> Result<AddressResult> {
        let mut inner = self.inner.write();
        if !inner.jobs.contains_key(job_id) {
            return Err(BatchError::not_found(format!("job {}", job_id)));
        }
        let key = (job_id.to_string(), address.to_string());
        if inner.by_address.contains_key(&key) {
            return Err(BatchError::validation(format!(
                "address {} already belongs to job {}",
                address, job_id
            )));
        }

        let row = AddressResult::new(
            Uuid::new_v4().to_string(),
            job_id.to_string(),
            address.to_string(),
        );
        inner.by_address.insert(key, row.id.clone());
        inner
            .job_results
            .entry(job_id.to_string())
            .or_default()
            .push(row.id.clone());
        inner.results.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn list_address_results(
        &self,
        job_id: &str,
        order: ResultOrder,
    ) -> Result<Vec<AddressResult>> {
        let inner = self.inner.read();
        let mut rows: Vec<AddressResult> = inner
            .job_results
            .get(job_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.results.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();

        if order == ResultOrder::Processed {
            // Stable sort keeps insertion order among ties and untouched rows
            rows.sort_by(|a, b| match (a.processed_at, b.processed_at) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
        Ok(rows)
    }

    async fn find_address_result(
        &self,
        job_id: &str,
        address: &str,
    ) -> Result<Option<AddressResult>> {
        let inner = self.inner.read();
        Ok(inner
            .by_address
            .get(&(job_id.to_string(), address.to_string()))
            .and_then(|id| inner.results.get(id).cloned()))
    }

    async fn update_address_result(
        &self,
        id: &str,
        update: AddressResultUpdate,
    ) -> Result<Option<AddressResult>> {
        let mut inner = self.inner.write();
        let Some(current) = inner.results.get(id) else {
            return Ok(None);
        };
        let next = current.apply(&update)?;
        inner.results.insert(id.to_string(), next.clone());
        Ok(Some(next))
    }
}

//! Common test utilities for balance-batch
//!
//! - Test fixtures and controller factories
//! - A mock upstream balance API
//! - Polling helpers for background runs

pub mod fixtures;
pub mod upstream;

pub use fixtures::{ControllerFactory, addresses};
pub use upstream::MockUpstream;

use balance_batch::{Job, JobController};
use std::time::Duration;

/// Poll until the job reaches a terminal status and its run has been reaped
pub async fn wait_for_terminal(controller: &JobController, job_id: &str) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let job = controller
            .get_job(job_id)
            .await
            .expect("job should exist while polling");
        if job.status.is_terminal() && !controller.is_running(job_id) {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {} still {} after 10s",
            job_id,
            job.status
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

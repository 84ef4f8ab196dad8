//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::services::jobs::JobController;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every worker; all fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Job orchestration
    pub jobs: Arc<JobController>,
}

impl AppState {
    pub fn new(config: Config, jobs: JobController) -> Self {
        Self {
            config: Arc::new(config),
            jobs: Arc::new(jobs),
        }
    }
}

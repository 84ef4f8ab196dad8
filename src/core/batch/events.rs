//! Structured progress events emitted while a job runs

use super::types::{AddressStatus, JobCounters, JobStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Progress notification for observers of a job run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The job moved to processing
    RunStarted { job_id: String, total: usize },
    /// One address reached a terminal status
    AddressProcessed {
        job_id: String,
        /// Position in the job's address list
        address_index: usize,
        address: String,
        status: AddressStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// The job reached a terminal status
    RunFinished {
        job_id: String,
        status: JobStatus,
        counters: JobCounters,
    },
}

impl ProgressEvent {
    pub fn job_id(&self) -> &str {
        match self {
            ProgressEvent::RunStarted { job_id, .. }
            | ProgressEvent::AddressProcessed { job_id, .. }
            | ProgressEvent::RunFinished { job_id, .. } => job_id,
        }
    }
}

/// Fan-out handle for progress events.
///
/// Sending never blocks and never fails the sender; events are dropped when
/// nobody is subscribed and lagging receivers skip ahead.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        Self::new(crate::config::models::default_event_buffer())
    }
}

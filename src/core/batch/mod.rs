//! Batch jobs: data model, progress events and the sequential runner

mod events;
mod runner;
mod types;


pub use events::{ProgressEvent, ProgressSink};
pub use runner::{BatchRunner, RunSummary};
pub use types::{
    AddressResult, AddressResultUpdate, AddressStatus, Job, JobCounters, JobSpec, JobStatus,
    JobUpdate,
};

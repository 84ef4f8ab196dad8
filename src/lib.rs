//! # balance-batch
//!
//! Batch wallet balance resolution against a remote balance API.
//!
//! ## Features
//!
//! - **Rate gating**: one job, one fixed calls-per-second ceiling, FIFO permits
//! - **Local retries**: 429 and transport failures are retried with backoff
//! - **Per-address progress**: every state change is persisted as it happens
//! - **Caller-driven mode**: external callers may report outcomes themselves
//! - **Export**: CSV or JSON dumps of a job's results
//!
//! ## Library use
//!
//! ```rust,no_run
//! use balance_batch::{Config, JobController, NewJob};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     let jobs = JobController::from_config(&config)?;
//!
//!     let job = jobs
//!         .submit(NewJob::default(), vec!["addrA".into(), "addrB".into()])
//!         .await?;
//!     println!("started job {}", job.id);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{
    AddressResult, AddressStatus, BatchRunner, Job, JobStatus, ProgressEvent, RunSummary,
};
pub use core::lookup::{BalanceLookup, BalanceLookupClient, FailureReason, LookupOutcome};
pub use core::rate_limiter::RateGate;
pub use services::jobs::{ExportFormat, JobController, NewJob, ReportedOutcome};
pub use storage::{InMemoryResultStore, ResultOrder, ResultStore};
pub use utils::error::{BatchError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

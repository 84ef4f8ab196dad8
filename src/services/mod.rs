//! Services module
//!
//! This module contains business logic and service implementations

pub mod jobs;

pub use jobs::{ExportFormat, JobController, NewJob, ReportedOutcome};

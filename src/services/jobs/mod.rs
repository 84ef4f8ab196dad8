//! Job orchestration service
//!
//! Owns job creation, address intake, background runs and result export.
//! HTTP handlers and the binary talk to jobs only through [`JobController`].

mod controller;
mod export;
mod submit;
mod types;


pub use controller::JobController;
pub use export::{ExportFormat, render_results};
pub use types::{NewJob, ReportedOutcome, normalize_addresses};

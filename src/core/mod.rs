//! Core functionality for the batch service
//!
//! This module contains the job model, the rate gate, the upstream lookup
//! client and the runner that ties them together.

pub mod batch;
pub mod lookup;
pub mod rate_limiter;

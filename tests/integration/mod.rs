//! Integration tests for balance-batch
//!
//! These tests verify the interaction between multiple components
//! against a mocked upstream balance API.

pub mod api_tests;
pub mod config_validation_tests;
pub mod job_lifecycle_tests;

//! Rate Limiting Implementation
//!
//! Provides the fixed-cadence gate that paces upstream lookups for one job run

mod gate;


pub use gate::RateGate;

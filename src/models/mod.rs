//! Data models for the stress test
//!
//! Per-request outcome records shared between the runner and the aggregation step.

mod outcome;

pub use outcome::RequestOutcome;

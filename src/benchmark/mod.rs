//! Concurrency ramp benchmark
//!
//! Runs chat completion requests at doubling concurrency levels until the
//! endpoint's average latency or error rate crosses a threshold.

mod escalation;
mod metrics;
mod runner;

pub use escalation::EscalationLoop;
pub use metrics::LevelSummary;
pub use runner::RequestRunner;

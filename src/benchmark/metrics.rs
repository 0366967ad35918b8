//! Per-level statistics
//!
//! Aggregates the outcomes of one concurrency level and checks them against
//! the stop thresholds.

use std::fmt;

use crate::config::StressConfig;
use crate::models::RequestOutcome;

/// Limits beyond which the ramp stops
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Maximum average latency in seconds
    pub latency_secs: f64,
    /// Maximum error rate (0.0 - 1.0)
    pub error_rate: f64,
}

impl From<&StressConfig> for Thresholds {
    fn from(config: &StressConfig) -> Self {
        Self {
            latency_secs: config.latency_threshold_secs,
            error_rate: config.error_rate_threshold,
        }
    }
}

/// Which threshold a level exceeded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopTrigger {
    Latency,
    ErrorRate,
    Both,
}

impl fmt::Display for StopTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopTrigger::Latency => write!(f, "average latency"),
            StopTrigger::ErrorRate => write!(f, "error rate"),
            StopTrigger::Both => write!(f, "average latency and error rate"),
        }
    }
}

/// Aggregated statistics of one concurrency level
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSummary {
    pub concurrency: usize,
    pub successes: usize,
    /// Mean latency in seconds over outcomes that have one
    pub avg_latency_secs: f64,
    /// Mean completion tokens over outcomes that report a count
    pub avg_tokens: f64,
    /// Total tokens per total latency-second
    pub avg_throughput: f64,
    pub error_rate: f64,
    /// One entry per failed outcome, in arrival order
    pub errors: Vec<String>,
}

impl LevelSummary {
    pub fn from_outcomes(concurrency: usize, outcomes: &[RequestOutcome]) -> Self {
        let latencies: Vec<f64> = outcomes.iter().filter_map(|o| o.latency_secs()).collect();
        let tokens: Vec<u64> = outcomes.iter().filter_map(|o| o.tokens).collect();
        let successes = outcomes.iter().filter(|o| o.success).count();

        // Throughput is a ratio of sums over outcomes carrying both values
        let (token_sum, latency_sum) = outcomes
            .iter()
            .filter_map(|o| Some((o.tokens?, o.latency_secs()?)))
            .fold((0u64, 0.0f64), |(t, l), (tokens, secs)| (t + tokens, l + secs));

        let avg_throughput = if latency_sum > 0.0 {
            token_sum as f64 / latency_sum
        } else {
            0.0
        };

        let error_rate = if concurrency == 0 {
            0.0
        } else {
            1.0 - successes as f64 / concurrency as f64
        };

        Self {
            concurrency,
            successes,
            avg_latency_secs: mean(&latencies),
            avg_tokens: mean(&tokens.iter().map(|&t| t as f64).collect::<Vec<_>>()),
            avg_throughput,
            error_rate,
            errors: outcomes.iter().filter_map(|o| o.error.clone()).collect(),
        }
    }

    /// Threshold this level exceeded, if any. Equal values do not count.
    pub fn breach(&self, thresholds: &Thresholds) -> Option<StopTrigger> {
        let latency = self.avg_latency_secs > thresholds.latency_secs;
        let errors = self.error_rate > thresholds.error_rate;
        match (latency, errors) {
            (true, true) => Some(StopTrigger::Both),
            (true, false) => Some(StopTrigger::Latency),
            (false, true) => Some(StopTrigger::ErrorRate),
            (false, false) => None,
        }
    }

    pub fn failures(&self) -> usize {
        self.concurrency.saturating_sub(self.successes)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

//! CLI argument parsing
//!
//! Every flag is optional; running without arguments uses the built-in
//! defaults (or a discovered config file).

use clap::Parser;
use std::path::PathBuf;

use crate::config::StressConfig;

/// Find the concurrency at which a chat completion endpoint degrades
#[derive(Parser, Debug, Default)]
#[command(name = "llm-stress")]
#[command(version)]
#[command(about = "Ramp concurrent chat completion requests until latency or errors exceed a threshold")]
#[command(long_about = None)]
pub struct Args {
    /// Config file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Chat completion endpoint URL
    #[arg(long)]
    pub url: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// User prompt sent with every request
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Highest concurrency level to try
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Average latency in seconds that ends the test
    #[arg(long)]
    pub latency_threshold: Option<f64>,

    /// Error rate (0.0 - 1.0) that ends the test
    #[arg(long)]
    pub error_threshold: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of `config`
    pub fn apply(&self, config: &mut StressConfig) {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        if let Some(max) = self.max_concurrency {
            config.max_concurrency = max;
        }
        if let Some(threshold) = self.latency_threshold {
            config.latency_threshold_secs = threshold;
        }
        if let Some(threshold) = self.error_threshold {
            config.error_rate_threshold = threshold;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
    }
}

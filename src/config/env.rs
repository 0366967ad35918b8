//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "LLM_STRESS";

/// Configuration overrides read from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Endpoint from LLM_STRESS_URL
    pub url: Option<String>,
    /// Model from LLM_STRESS_MODEL
    pub model: Option<String>,
    /// Prompt from LLM_STRESS_PROMPT
    pub prompt: Option<String>,
    /// Ceiling from LLM_STRESS_MAX_CONCURRENCY
    pub max_concurrency: Option<usize>,
    /// Seconds from LLM_STRESS_LATENCY_THRESHOLD
    pub latency_threshold: Option<f64>,
    /// Fraction from LLM_STRESS_ERROR_THRESHOLD
    pub error_threshold: Option<f64>,
    /// Seconds from LLM_STRESS_TIMEOUT
    pub timeout: Option<u64>,
    /// Config file from LLM_STRESS_CONFIG
    pub config_file: Option<PathBuf>,
    /// Verbose from LLM_STRESS_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            url: get_env("URL"),
            model: get_env("MODEL"),
            prompt: get_env("PROMPT"),
            max_concurrency: get_env_parse("MAX_CONCURRENCY"),
            latency_threshold: get_env_parse("LATENCY_THRESHOLD"),
            error_threshold: get_env_parse("ERROR_THRESHOLD"),
            timeout: get_env_parse("TIMEOUT"),
            config_file: get_env("CONFIG").map(PathBuf::from),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.url.is_some()
            || self.model.is_some()
            || self.prompt.is_some()
            || self.max_concurrency.is_some()
            || self.latency_threshold.is_some()
            || self.error_threshold.is_some()
            || self.timeout.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

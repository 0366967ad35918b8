//! Configuration module
//!
//! Builds the immutable stress test configuration from defaults, an optional
//! config file, environment variables and command-line overrides.

mod env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use env::EnvConfig;

/// Config file locations searched when none is given (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./llm-stress.yaml",
    "./llm-stress.yml",
    "./llm-stress.json",
    "~/.config/llm-stress/config.yaml",
];

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Endpoint URL must not be empty")]
    EmptyUrl,

    #[error("Endpoint URL must start with http:// or https://: {0}")]
    InvalidUrl(String),

    #[error("Model identifier must not be empty")]
    EmptyModel,

    #[error("Maximum concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Latency threshold must be a positive number of seconds, got {0}")]
    InvalidLatencyThreshold(f64),

    #[error("Error rate threshold must be within [0, 1], got {0}")]
    InvalidErrorThreshold(f64),

    #[error("Request timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Stress test configuration.
///
/// Built once at startup and shared read-only by every request task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Chat completion endpoint
    pub url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// User prompt sent with every request
    pub prompt: String,

    /// Highest concurrency level to try
    pub max_concurrency: usize,

    /// Average latency (seconds) above which the test stops
    pub latency_threshold_secs: f64,

    /// Error rate (0.0 - 1.0) above which the test stops
    pub error_rate_threshold: f64,

    /// Hard per-request network timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434/v1/chat/completions".to_string(),
            model: "deepseek-r1:671b".to_string(),
            prompt: "你是什么模型".to_string(),
            max_concurrency: 256,
            latency_threshold_secs: 180.0,
            error_rate_threshold: 0.9,
            timeout_secs: 300,
        }
    }
}

impl StressConfig {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }

    /// Find a configuration file in the standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from an explicit path, else a discovered file, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::find() {
                Some(found) => Self::load(found),
                None => Ok(Self::default()),
            },
        }
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.url {
            self.url = url.clone();
        }
        if let Some(model) = &env.model {
            self.model = model.clone();
        }
        if let Some(prompt) = &env.prompt {
            self.prompt = prompt.clone();
        }
        if let Some(max) = env.max_concurrency {
            self.max_concurrency = max;
        }
        if let Some(threshold) = env.latency_threshold {
            self.latency_threshold_secs = threshold;
        }
        if let Some(threshold) = env.error_threshold {
            self.error_rate_threshold = threshold;
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if !self.latency_threshold_secs.is_finite() || self.latency_threshold_secs <= 0.0 {
            return Err(ConfigError::InvalidLatencyThreshold(
                self.latency_threshold_secs,
            ));
        }
        if !(0.0..=1.0).contains(&self.error_rate_threshold) {
            return Err(ConfigError::InvalidErrorThreshold(self.error_rate_threshold));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = StressConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:11434/v1/chat/completions");
        assert_eq!(config.model, "deepseek-r1:671b");
        assert_eq!(config.max_concurrency, 256);
        assert_eq!(config.latency_threshold_secs, 180.0);
        assert_eq!(config.error_rate_threshold, 0.9);
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_partial() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("llm-stress.yaml");
        std::fs::write(
            &path,
            "model: qwen2.5:7b\nmax_concurrency: 32\nlatency_threshold_secs: 60.0\n",
        )
        .unwrap();

        let config = StressConfig::load(&path).unwrap();
        assert_eq!(config.model, "qwen2.5:7b");
        assert_eq!(config.max_concurrency, 32);
        assert_eq!(config.latency_threshold_secs, 60.0);
        // Unset fields keep their defaults
        assert_eq!(config.error_rate_threshold, 0.9);
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"url": "https://llm.internal/v1/chat/completions"}"#).unwrap();

        let config = StressConfig::load(&path).unwrap();
        assert_eq!(config.url, "https://llm.internal/v1/chat/completions");
        assert_eq!(config.model, "deepseek-r1:671b");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(StressConfig::load(dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_load_or_default_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.yml");
        std::fs::write(&path, "prompt: hello\n").unwrap();

        let config = StressConfig::load_or_default(Some(path.as_path())).unwrap();
        assert_eq!(config.prompt, "hello");
    }

    #[test]
    fn test_apply_env() {
        let mut config = StressConfig::default();
        let env = EnvConfig {
            model: Some("llama3".to_string()),
            error_threshold: Some(0.5),
            ..Default::default()
        };
        config.apply_env(&env);

        assert_eq!(config.model, "llama3");
        assert_eq!(config.error_rate_threshold, 0.5);
        assert_eq!(config.max_concurrency, 256);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = StressConfig::default();

        let config = StressConfig {
            url: String::new(),
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyUrl));

        let config = StressConfig {
            url: "localhost:11434".to_string(),
            ..base.clone()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        let config = StressConfig {
            max_concurrency: 0,
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroConcurrency));

        let config = StressConfig {
            latency_threshold_secs: 0.0,
            ..base.clone()
        };
        assert!(config.validate().is_err());

        let config = StressConfig {
            error_rate_threshold: 1.5,
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidErrorThreshold(1.5)));

        let config = StressConfig {
            timeout_secs: 0,
            ..base
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_is_yaml_file() {
        assert!(is_yaml_file(Path::new("a.yaml")));
        assert!(is_yaml_file(Path::new("a.yml")));
        assert!(!is_yaml_file(Path::new("a.json")));
    }
}

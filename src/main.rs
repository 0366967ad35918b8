//! llm-stress - concurrency ramp stress tester for chat completion endpoints
//!
//! Sends 1, 2, 4, 8, ... simultaneous chat completion requests to an
//! OpenAI-style endpoint and stops at the first level whose average latency
//! or error rate exceeds the configured threshold.
//!
//! ## Usage
//!
//! ```bash
//! # Run against the defaults (local Ollama endpoint)
//! llm-stress
//!
//! # Point at another server and lower the ceiling
//! llm-stress --url http://10.0.0.5:8000/v1/chat/completions --model qwen2.5:14b --max-concurrency 64
//!
//! # Settings can also come from a file or LLM_STRESS_* variables
//! llm-stress --config llm-stress.yaml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing::{info, Level};

mod benchmark;
mod cli;
mod config;
mod http;
mod models;
mod output;
mod utils;

use benchmark::{EscalationLoop, RequestRunner};
use cli::Args;
use config::{EnvConfig, StressConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    let verbose = args.verbose || env.verbose.unwrap_or(false);
    utils::init_logger(if verbose { Level::DEBUG } else { Level::INFO });

    let config = build_config(&args, &env)?;
    info!(
        "Stress testing {} at {} (max concurrency {}, latency threshold {}s, error threshold {})",
        config.model,
        config.url,
        config.max_concurrency,
        config.latency_threshold_secs,
        config.error_rate_threshold
    );

    let runner = Arc::new(RequestRunner::new(&config)?);

    println!("{}", output::format_start(&config.model));

    let escalation = EscalationLoop::new(runner, &config);
    let report = escalation
        .run(&mut io::stdout())
        .await
        .context("Failed to write report")?;

    if report.hit_bottleneck() {
        info!("Bottleneck found after {} levels", report.levels.len());
    }
    match report.last_healthy_concurrency() {
        Some(healthy) => info!("Highest concurrency within thresholds: {}", healthy),
        None => info!("No concurrency level stayed within thresholds"),
    }

    Ok(())
}

/// Merge defaults, config file, environment and flags, then validate
fn build_config(args: &Args, env: &EnvConfig) -> Result<StressConfig> {
    let path = args.config.as_deref().or(env.config_file.as_deref());
    let mut config = StressConfig::load_or_default(path)?;

    if env.has_any() {
        config.apply_env(env);
    }
    args.apply(&mut config);

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

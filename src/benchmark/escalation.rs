//! Concurrency escalation loop
//!
//! Fires 1, 2, 4, 8, ... simultaneous requests, one level at a time, until a
//! threshold is breached or the configured ceiling is passed.

use futures::future::join_all;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::metrics::{LevelSummary, StopTrigger, Thresholds};
use super::runner::CompletionProbe;
use crate::config::StressConfig;
use crate::models::RequestOutcome;
use crate::output;
use crate::utils::Timer;

/// How the ramp ended
#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    /// A level exceeded a threshold
    Bottleneck {
        concurrency: usize,
        trigger: StopTrigger,
        avg_latency_secs: f64,
        error_rate: f64,
    },
    /// Every level up to the ceiling stayed within the thresholds
    CeilingReached { max_concurrency: usize },
}

/// Everything the loop measured, in level order
#[derive(Clone, Debug)]
pub struct EscalationReport {
    pub levels: Vec<LevelSummary>,
    pub termination: Termination,
}

impl EscalationReport {
    pub fn hit_bottleneck(&self) -> bool {
        matches!(self.termination, Termination::Bottleneck { .. })
    }

    /// Highest level that stayed within the thresholds
    pub fn last_healthy_concurrency(&self) -> Option<usize> {
        let healthy = match self.termination {
            Termination::Bottleneck { .. } => self.levels.len().saturating_sub(1),
            Termination::CeilingReached { .. } => self.levels.len(),
        };
        self.levels[..healthy].last().map(|l| l.concurrency)
    }
}

/// Drives the probe through doubling concurrency levels
pub struct EscalationLoop<P> {
    probe: Arc<P>,
    max_concurrency: usize,
    thresholds: Thresholds,
}

impl<P: CompletionProbe> EscalationLoop<P> {
    pub fn new(probe: Arc<P>, config: &StressConfig) -> Self {
        Self {
            probe,
            max_concurrency: config.max_concurrency,
            thresholds: Thresholds::from(config),
        }
    }

    /// Run the ramp, writing report lines to `out` as each level completes
    pub async fn run<W: Write>(&self, out: &mut W) -> io::Result<EscalationReport> {
        let mut levels = Vec::new();
        let mut concurrency = 1usize;

        while concurrency <= self.max_concurrency {
            info!("Running level with {} concurrent requests", concurrency);
            let timer = Timer::start(format!("level {concurrency}"));

            let outcomes = self.run_level(concurrency).await;
            debug_assert_eq!(outcomes.len(), concurrency);
            debug!(
                "Level {} completed in {:.2}s",
                concurrency,
                timer.stop_secs()
            );

            let summary = LevelSummary::from_outcomes(concurrency, &outcomes);
            writeln!(out, "{}", output::format_level(&summary))?;
            for error in &summary.errors {
                writeln!(out, "{}", output::format_error(error))?;
            }
            out.flush()?;

            if let Some(trigger) = summary.breach(&self.thresholds) {
                warn!(
                    "{} threshold exceeded at concurrency {} ({} of {} requests failed)",
                    trigger,
                    concurrency,
                    summary.failures(),
                    concurrency
                );
                writeln!(out, "{}", output::format_bottleneck(&summary))?;
                out.flush()?;

                let termination = Termination::Bottleneck {
                    concurrency,
                    trigger,
                    avg_latency_secs: summary.avg_latency_secs,
                    error_rate: summary.error_rate,
                };
                levels.push(summary);
                return Ok(EscalationReport {
                    levels,
                    termination,
                });
            }

            levels.push(summary);
            concurrency = match concurrency.checked_mul(2) {
                Some(next) => next,
                None => break,
            };
        }

        info!(
            "Reached maximum concurrency {} without exceeding thresholds",
            self.max_concurrency
        );
        writeln!(out, "{}", output::format_ceiling_reached(self.max_concurrency))?;
        out.flush()?;

        Ok(EscalationReport {
            levels,
            termination: Termination::CeilingReached {
                max_concurrency: self.max_concurrency,
            },
        })
    }

    /// Launch `concurrency` requests at once and wait for all of them.
    ///
    /// One task per request, so the pool is exactly as wide as the level.
    /// Always yields exactly `concurrency` outcomes; a task that dies is
    /// recorded as a failed request.
    async fn run_level(&self, concurrency: usize) -> Vec<RequestOutcome> {
        let handles: Vec<_> = (0..concurrency)
            .map(|_| {
                let probe = Arc::clone(&self.probe);
                tokio::spawn(async move { probe.probe().await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    debug!("Request task did not complete: {}", e);
                    RequestOutcome::transport_failure(format!("request task failed: {e}"))
                })
            })
            .collect()
    }
}

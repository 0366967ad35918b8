//! Report line formatters

use crate::benchmark::LevelSummary;

pub fn format_start(model: &str) -> String {
    format!("{model} stress test starting...")
}

/// Summary line printed after every level
pub fn format_level(summary: &LevelSummary) -> String {
    format!(
        "concurrency: {}, avg tokens: {:.2}, avg latency: {:.2}s, avg throughput: {:.2} tokens/s",
        summary.concurrency, summary.avg_tokens, summary.avg_latency_secs, summary.avg_throughput
    )
}

pub fn format_error(error: &str) -> String {
    format!("request failed: error={error}")
}

/// Printed only when a threshold stops the ramp
pub fn format_bottleneck(summary: &LevelSummary) -> String {
    format!(
        "bottleneck reached, stopping test, avg latency={}, error rate={}",
        summary.avg_latency_secs, summary.error_rate
    )
}

pub fn format_ceiling_reached(max_concurrency: usize) -> String {
    format!("max concurrency {max_concurrency} reached without hitting a bottleneck")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> LevelSummary {
        LevelSummary {
            concurrency: 8,
            successes: 6,
            avg_latency_secs: 12.3456,
            avg_tokens: 250.0,
            avg_throughput: 20.254,
            error_rate: 0.25,
            errors: vec!["timeout".to_string()],
        }
    }

    #[test]
    fn test_format_level() {
        assert_eq!(
            format_level(&summary()),
            "concurrency: 8, avg tokens: 250.00, avg latency: 12.35s, avg throughput: 20.25 tokens/s"
        );
    }

    #[test]
    fn test_format_bottleneck() {
        assert_eq!(
            format_bottleneck(&summary()),
            "bottleneck reached, stopping test, avg latency=12.3456, error rate=0.25"
        );
    }

    #[test]
    fn test_format_misc() {
        assert_eq!(format_start("llama3"), "llama3 stress test starting...");
        assert_eq!(format_error("boom"), "request failed: error=boom");
        assert_eq!(
            format_ceiling_reached(256),
            "max concurrency 256 reached without hitting a bottleneck"
        );
    }
}

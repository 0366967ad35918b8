//! Timer utilities

use std::time::{Duration, Instant};

/// Wall-clock timer for a labelled operation
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and return elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::trace!("{} took {:.3}s", self.label, elapsed.as_secs_f64());
        elapsed
    }

    /// Stop timer and return elapsed seconds, the unit report lines use
    pub fn stop_secs(self) -> f64 {
        self.stop().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timer_measures_awaited_work() {
        let timer = Timer::start("request");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(timer.elapsed() >= Duration::from_millis(20));
        assert!(timer.stop() >= Duration::from_millis(20));
    }

    #[test]
    fn test_stop_secs() {
        let timer = Timer::start("level 1");
        std::thread::sleep(Duration::from_millis(15));
        let secs = timer.stop_secs();
        assert!(secs >= 0.015);
        assert!(secs < 5.0);
    }
}

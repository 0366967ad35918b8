//! Outcome of a single chat completion request

use std::fmt;
use std::time::Duration;

/// Result of one chat completion call.
///
/// A transport failure leaves `latency` empty and reports zero tokens; a
/// response that arrived with an unexpected status or body keeps its latency
/// but carries no token count.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOutcome {
    pub latency: Option<Duration>,
    pub success: bool,
    pub error: Option<String>,
    pub tokens: Option<u64>,
}

impl RequestOutcome {
    pub fn success(latency: Duration, tokens: u64) -> Self {
        Self {
            latency: Some(latency),
            success: true,
            error: None,
            tokens: Some(tokens),
        }
    }

    /// The server answered, but not with a usable completion
    pub fn rejected(latency: Duration, error: impl Into<String>) -> Self {
        Self {
            latency: Some(latency),
            success: false,
            error: Some(error.into()),
            tokens: None,
        }
    }

    /// The request never produced a response
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self {
            latency: None,
            success: false,
            error: Some(error.into()),
            tokens: Some(0),
        }
    }

    pub fn latency_secs(&self) -> Option<f64> {
        self.latency.map(|l| l.as_secs_f64())
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "ok" } else { "failed" };
        match self.latency {
            Some(latency) => write!(f, "{} [{}ms]", status, latency.as_millis())?,
            None => write!(f, "{status} [no response]")?,
        }
        if let Some(tokens) = self.tokens {
            write!(f, " tokens={tokens}")?;
        }
        if let Some(err) = &self.error {
            write!(f, " - {err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_outcome() {
        let outcome = RequestOutcome::success(Duration::from_millis(1500), 42);
        assert!(outcome.success);
        assert_eq!(outcome.tokens, Some(42));
        assert_eq!(outcome.latency_secs(), Some(1.5));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_transport_failure_reports_zero_tokens() {
        let outcome = RequestOutcome::transport_failure("connection refused");
        assert!(!outcome.success);
        assert!(outcome.latency.is_none());
        assert_eq!(outcome.tokens, Some(0));
        assert_eq!(outcome.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_rejected_keeps_latency() {
        let outcome = RequestOutcome::rejected(Duration::from_secs(2), "overloaded");
        assert!(!outcome.success);
        assert_eq!(outcome.latency, Some(Duration::from_secs(2)));
        assert!(outcome.tokens.is_none());
    }

    #[test]
    fn test_display() {
        let outcome = RequestOutcome::transport_failure("timed out");
        assert_eq!(outcome.to_string(), "failed [no response] tokens=0 - timed out");
    }
}

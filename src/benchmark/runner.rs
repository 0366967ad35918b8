//! Single request execution
//!
//! Sends one chat completion and turns whatever happens into a
//! [`RequestOutcome`].

use std::future::Future;
use tracing::debug;

use crate::config::StressConfig;
use crate::http::{ChatClient, ChatRequest, HttpError};
use crate::models::RequestOutcome;
use crate::utils::Timer;

/// Something that can issue one request and report its outcome.
///
/// Implementations must never fail: every error becomes a failed outcome.
pub trait CompletionProbe: Send + Sync + 'static {
    fn probe(&self) -> impl Future<Output = RequestOutcome> + Send;
}

/// Issues chat completion requests against the configured endpoint
pub struct RequestRunner {
    client: ChatClient,
    request: ChatRequest,
}

impl RequestRunner {
    pub fn new(config: &StressConfig) -> Result<Self, HttpError> {
        let client = ChatClient::new(config.url.clone(), config.timeout())?;
        let request = ChatRequest::user_prompt(config.model.clone(), config.prompt.clone());
        Ok(Self { client, request })
    }

    /// Perform one request and classify the result
    pub async fn run(&self) -> RequestOutcome {
        let outcome = self.attempt().await;
        debug!("Request to {}: {}", self.client.url(), outcome);
        outcome
    }

    async fn attempt(&self) -> RequestOutcome {
        let timer = Timer::start("chat completion");

        let response = match self.client.complete(&self.request).await {
            Ok(response) => response,
            Err(e) => return RequestOutcome::transport_failure(e.to_string()),
        };

        let latency = timer.stop();

        if !response.is_ok() {
            return RequestOutcome::rejected(latency, response.body);
        }

        match response.completion_tokens() {
            Ok(tokens) => RequestOutcome::success(latency, tokens),
            Err(e) => RequestOutcome::rejected(latency, e.to_string()),
        }
    }
}

impl CompletionProbe for RequestRunner {
    fn probe(&self) -> impl Future<Output = RequestOutcome> + Send {
        self.run()
    }
}

//! HTTP client for OpenAI-style chat completion endpoints
//!
//! Sends non-streaming chat completion requests and extracts the completion
//! token count from the response.

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connect error: {0}")]
    Connect(String),

    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    #[error("Response is missing usage.completion_tokens")]
    MissingCompletionTokens,
}

/// Single chat message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// Non-streaming request carrying a single user prompt
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        }
    }
}

/// Token accounting block of a completion response
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Usage {
    pub completion_tokens: Option<u64>,
}

/// Successful completion response, only the fields we read
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub usage: Option<Usage>,
}

impl ChatResponse {
    pub fn parse(body: &str) -> Result<Self, HttpError> {
        serde_json::from_str(body).map_err(|e| HttpError::InvalidBody(e.to_string()))
    }

    pub fn completion_tokens(&self) -> Result<u64, HttpError> {
        self.usage
            .as_ref()
            .and_then(|u| u.completion_tokens)
            .ok_or(HttpError::MissingCompletionTokens)
    }
}

/// Raw response of a completion call
#[derive(Clone, Debug)]
pub struct CompletionResponse {
    pub status: StatusCode,
    pub body: String,
}

impl CompletionResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Completion token count of a 200 response
    pub fn completion_tokens(&self) -> Result<u64, HttpError> {
        ChatResponse::parse(&self.body)?.completion_tokens()
    }
}

/// Client bound to one chat completion endpoint
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    url: String,
    timeout_secs: u64,
}

impl ChatClient {
    /// Create client with a hard per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a chat completion request and read the whole body.
    ///
    /// Any status code is returned as a response; only failures to obtain
    /// one are errors.
    pub async fn complete(&self, request: &ChatRequest) -> Result<CompletionResponse, HttpError> {
        debug!("Sending chat completion to {} (model {})", self.url, request.model);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else {
                HttpError::BodyRead(error_chain(&e))
            }
        })?;

        debug!(
            "Response: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        Ok(CompletionResponse { status, body })
    }

    fn classify(&self, e: reqwest::Error) -> HttpError {
        if e.is_timeout() {
            HttpError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            HttpError::Connect(error_chain(&e))
        } else {
            HttpError::RequestFailed(error_chain(&e))
        }
    }
}

/// Render an error and all of its sources as `outer: inner: ...`
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // hyper and reqwest sometimes repeat the inner message in the outer one
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

//! HTTP client module
//!
//! Chat completion wire types and the client used to send them.

mod client;

pub use client::{ChatClient, ChatRequest, HttpError};

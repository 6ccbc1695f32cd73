//! Generative Model Module
//!
//! The boundary to the hosted language model: a prompt plus a response
//! schema goes in, a schema-shaped JSON document (or a provider error)
//! comes out.

mod classify;
mod gemini;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use classify::{classify_error, ErrorClass, QUOTA_MESSAGE};
pub use gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};

// == Provider Error ==
/// Failures reported by a generative model backend.
///
/// The `Display` text is what [`classify_error`] inspects.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The API answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never completed
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response was not the JSON document the schema promised
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response contained no candidate text
    #[error("Empty response from model")]
    EmptyResponse,
}

// == Generative Model ==
/// A schema-constrained JSON generator.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends `prompt` and returns a JSON document shaped by `schema`.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, ProviderError>;

    /// Short backend name used in logs.
    fn name(&self) -> &str;
}

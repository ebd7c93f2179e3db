//! Text generation agent seam.
//!
//! The hosted LLM is an opaque prompt-in/text-out collaborator; this
//! trait is the only surface the application layer sees.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by a text agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent could not execute the request at all.
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// The upstream API rejected or failed the request.
    #[error("Agent process error (status {status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// An opaque prompt-in/text-out language model client.
#[async_trait]
pub trait TextAgent: Send + Sync {
    /// Generates text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

//! Backend port
//!
//! Defines the interface for a single generative-text backend (an "agent").

use crate::context::CallContext;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during a single backend call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl BackendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BackendError::Cancelled)
    }
}

/// A generative-text backend
///
/// Implementations (adapters) live in the infrastructure layer. They must be
/// safe to call concurrently and repeatedly, and should return promptly once
/// `ctx` is cancelled or its deadline passes. The orchestrator also enforces
/// both on its side, so a backend that ignores `ctx` is dropped rather than
/// awaited.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Human readable label, e.g. "openai/gpt-4o"
    fn name(&self) -> &str;

    /// Produce a completion for `prompt`
    async fn generate(&self, ctx: &CallContext, prompt: &str) -> Result<String, BackendError>;
}

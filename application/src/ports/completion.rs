//! Completion gateway port
//!
//! Defines the single network-facing capability the analysis depends on:
//! turning a prompt into model text.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for text completion.
///
/// Implementations (adapters) live in the infrastructure layer and must be
/// safe for concurrent use. Retries and rate limiting are the adapter's
/// concern. An empty or whitespace-only string means the backend returned
/// nothing.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError>;

    /// Backend identifier for logs
    fn name(&self) -> &str {
        "completion"
    }
}

#[async_trait]
impl<T: CompletionGateway + ?Sized> CompletionGateway for Arc<T> {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        (**self).complete(prompt, max_tokens, temperature).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

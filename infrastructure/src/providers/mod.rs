//! Completion backends
//!
//! Each adapter implements [`CompletionGateway`] over a plain HTTP API:
//!
//! | Kind | Endpoint | Auth |
//! |------|----------|------|
//! | `ollama` | `POST {base_url}/api/generate` | none |
//! | `groq` | `POST {base_url}/chat/completions` | bearer key |
//! | `claude` | `POST {base_url}/v1/messages` | `x-api-key` |
//!
//! [`BackendGateway`] dispatches to whichever adapter the configuration names.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use incident_application::ports::completion::{CompletionGateway, GatewayError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub use anthropic::AnthropicGateway;
pub use ollama::OllamaGateway;
pub use openai::OpenAiCompatibleGateway;

/// Errors raised while constructing a backend
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Unknown backend: {0} (expected ollama, groq or claude)")]
    UnknownBackend(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Which completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Ollama,
    #[default]
    Groq,
    Claude,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "ollama",
            BackendKind::Groq => "groq",
            BackendKind::Claude => "claude",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "llama3.1:8b",
            BackendKind::Groq => "llama-3.3-70b-versatile",
            BackendKind::Claude => "claude-sonnet-4-20250514",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "http://localhost:11434",
            BackendKind::Groq => "https://api.groq.com/openai/v1",
            BackendKind::Claude => "https://api.anthropic.com",
        }
    }

    /// Environment variable holding the API key, if the backend needs one
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            BackendKind::Ollama => None,
            BackendKind::Groq => Some("GROQ_API_KEY"),
            BackendKind::Claude => Some("ANTHROPIC_API_KEY"),
        }
    }

    /// Local models are slow; hosted APIs get shorter client timeouts
    pub fn default_timeout(&self) -> Duration {
        match self {
            BackendKind::Ollama => Duration::from_secs(180),
            BackendKind::Groq => Duration::from_secs(30),
            BackendKind::Claude => Duration::from_secs(60),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" | "local" => Ok(BackendKind::Ollama),
            "groq" | "openai" => Ok(BackendKind::Groq),
            "claude" | "anthropic" => Ok(BackendKind::Claude),
            _ => Err(ProviderError::UnknownBackend(s.to_string())),
        }
    }
}

/// Fully resolved connection settings for one backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub model: String,
    pub base_url: String,
    pub api_key_env: Option<String>,
    pub request_timeout: Duration,
}

impl BackendSettings {
    /// Settings with every field at the backend's default
    pub fn for_kind(kind: BackendKind) -> Self {
        Self {
            kind,
            model: kind.default_model().to_string(),
            base_url: kind.default_base_url().to_string(),
            api_key_env: kind.default_api_key_env().map(str::to_string),
            request_timeout: kind.default_timeout(),
        }
    }

    /// Read the API key from the configured environment variable
    fn api_key(&self) -> Result<String, ProviderError> {
        let var = self
            .api_key_env
            .clone()
            .unwrap_or_else(|| format!("{}_API_KEY", self.kind.as_str().to_uppercase()));
        match std::env::var(&var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ProviderError::MissingApiKey(var)),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn http_client(&self) -> Result<reqwest::Client, ProviderError> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?)
    }
}

/// The configured completion backend
pub enum BackendGateway {
    Ollama(OllamaGateway),
    Groq(OpenAiCompatibleGateway),
    Claude(AnthropicGateway),
}

impl BackendGateway {
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, ProviderError> {
        Ok(match settings.kind {
            BackendKind::Ollama => BackendGateway::Ollama(OllamaGateway::new(settings)?),
            BackendKind::Groq => BackendGateway::Groq(OpenAiCompatibleGateway::new(settings)?),
            BackendKind::Claude => BackendGateway::Claude(AnthropicGateway::new(settings)?),
        })
    }

    pub fn model(&self) -> &str {
        match self {
            BackendGateway::Ollama(g) => g.model(),
            BackendGateway::Groq(g) => g.model(),
            BackendGateway::Claude(g) => g.model(),
        }
    }
}

#[async_trait]
impl CompletionGateway for BackendGateway {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        match self {
            BackendGateway::Ollama(g) => g.complete(prompt, max_tokens, temperature).await,
            BackendGateway::Groq(g) => g.complete(prompt, max_tokens, temperature).await,
            BackendGateway::Claude(g) => g.complete(prompt, max_tokens, temperature).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            BackendGateway::Ollama(g) => g.name(),
            BackendGateway::Groq(g) => g.name(),
            BackendGateway::Claude(g) => g.name(),
        }
    }
}

// ==================== Shared HTTP Helpers ====================

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

fn status_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
    let detail = body.trim();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    if detail.is_empty() {
        GatewayError::RequestFailed(format!("HTTP {} {}", status.as_u16(), reason))
    } else {
        GatewayError::RequestFailed(format!(
            "HTTP {} {}: {}",
            status.as_u16(),
            reason,
            incident_domain::core::string::truncate(detail, 200)
        ))
    }
}

/// Decode a response, mapping non-2xx status and bad JSON to gateway errors
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    let body = response.text().await.map_err(transport_error)?;
    serde_json::from_str(&body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

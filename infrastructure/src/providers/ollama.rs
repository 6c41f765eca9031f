//! Local Ollama backend (`/api/generate`, non-streaming)

use super::{BackendSettings, ProviderError, decode_response, transport_error};
use async_trait::async_trait;
use incident_application::ports::completion::{CompletionGateway, GatewayError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl<'a> GenerateRequest<'a> {
    pub(crate) fn new(model: &'a str, prompt: &'a str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature,
                num_predict: max_tokens,
            },
        }
    }
}

impl GenerateResponse {
    pub(crate) fn into_text(self) -> String {
        self.response.trim().to_string()
    }
}

/// Gateway for a local Ollama server
pub struct OllamaGateway {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGateway {
    pub fn new(settings: &BackendSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            client: settings.http_client()?,
            endpoint: settings.endpoint("api/generate"),
            model: settings.model.trim().to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionGateway for OllamaGateway {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        debug!("Calling Ollama {} ({} tokens)", self.model, max_tokens);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest::new(&self.model, prompt, max_tokens, temperature))
            .send()
            .await
            .map_err(transport_error)?;

        let body: GenerateResponse = decode_response(response).await?;
        Ok(body.into_text())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

//! Anthropic Messages API backend

use super::{BackendSettings, ProviderError, decode_response, transport_error};
use async_trait::async_trait;
use incident_application::ports::completion::{CompletionGateway, GatewayError};
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl<'a> MessagesRequest<'a> {
    pub(crate) fn new(model: &'a str, prompt: &'a str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            max_tokens,
            temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl MessagesResponse {
    /// Text of the first `text` block
    pub(crate) fn into_text(self) -> String {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Gateway for the Anthropic Messages API
pub struct AnthropicGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl AnthropicGateway {
    pub fn new(settings: &BackendSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: settings.api_key()?,
            client: settings.http_client()?,
            endpoint: settings.endpoint("v1/messages"),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionGateway for AnthropicGateway {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        debug!("Calling Claude {} ({} tokens)", self.model, max_tokens);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&MessagesRequest::new(&self.model, prompt, max_tokens, temperature))
            .send()
            .await
            .map_err(transport_error)?;

        let body: MessagesResponse = decode_response(response).await?;
        Ok(body.into_text())
    }

    fn name(&self) -> &str {
        "claude"
    }
}

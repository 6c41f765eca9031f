//! OpenAI-compatible chat completions backend (Groq)

use super::{BackendSettings, ProviderError, decode_response, transport_error};
use async_trait::async_trait;
use incident_application::ports::completion::{CompletionGateway, GatewayError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Extra attempts after an HTTP 429
const RATE_LIMIT_RETRIES: u32 = 2;
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(model: &'a str, prompt: &'a str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        }
    }
}

impl ChatResponse {
    /// Text of the first choice; empty when the backend returned none
    pub(crate) fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Gateway for OpenAI-compatible chat APIs
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleGateway {
    pub fn new(settings: &BackendSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: settings.api_key()?,
            client: settings.http_client()?,
            endpoint: settings.endpoint("chat/completions"),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionGateway for OpenAiCompatibleGateway {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GatewayError> {
        let request = ChatRequest::new(&self.model, prompt, max_tokens, temperature);
        let mut attempt = 0;

        loop {
            debug!("Calling {} (attempt {})", self.model, attempt + 1);

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                && attempt < RATE_LIMIT_RETRIES
            {
                attempt += 1;
                warn!(
                    "Rate limited by {}, retrying in {}s",
                    self.endpoint,
                    RATE_LIMIT_BACKOFF.as_secs()
                );
                tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
                continue;
            }

            let body: ChatResponse = decode_response(response).await?;
            return Ok(body.into_text());
        }
    }

    fn name(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body() {
        let request = ChatRequest::new("llama-3.3-70b-versatile", "Analyze", 600, 0.2);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["max_tokens"], 600);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Analyze");
    }

    #[test]
    fn test_first_choice_text() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  TRIGGER: pool exhausted\n"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text(), "TRIGGER: pool exhausted");
    }

    #[test]
    fn test_no_choices_is_empty() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(response.into_text(), "");

        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(response.into_text(), "");
    }
}

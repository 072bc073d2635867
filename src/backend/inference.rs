//! OpenAI-compatible chat-completion client
//!
//! Targets the Hugging Face inference router by default, but works with any
//! server exposing `POST {base_url}/chat/completions`.

use super::{ChatBackend, error_detail, join_url};
use crate::config::{ApiKey, InferenceConfig};
use crate::error::BackendError;
use crate::models::ChatTurn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const BACKEND: &str = "inference";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat backend speaking the OpenAI chat-completions protocol
pub struct InferenceClient {
    http: reqwest::Client,
    url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    api_key: Option<ApiKey>,
    timeout_seconds: u64,
}

impl InferenceClient {
    pub fn new(http: reqwest::Client, config: &InferenceConfig, timeout_seconds: u64) -> Self {
        if config.api_key.is_none() {
            tracing::warn!(
                base_url = %config.base_url,
                "No inference API key configured; requests will be sent unauthenticated"
            );
        }

        Self {
            http,
            url: join_url(&config.base_url, "chat/completions"),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            timeout_seconds,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for InferenceClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, BackendError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: turns,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        tracing::debug!(
            url = %self.url,
            model = %self.model,
            turn_count = turns.len(),
            "Sending chat completion request"
        );

        let mut request = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(BACKEND, self.timeout_seconds, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(BACKEND, self.timeout_seconds, e))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                backend: BACKEND,
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::malformed(BACKEND, e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::malformed(BACKEND, "response contained no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| BackendError::malformed(BACKEND, "first choice has no text content"))
    }
}

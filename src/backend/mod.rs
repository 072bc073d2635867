//! Upstream providers the relays forward to
//!
//! Handlers only see the [`ChatBackend`] and [`Translator`] traits. Concrete
//! HTTP adapters are built from [`Config`] at startup and injected through
//! `AppState`, so tests can substitute stubs.

use crate::config::{Config, TranslationProvider};
use crate::error::{AppError, AppResult, BackendError};
use crate::models::ChatTurn;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub mod google;
pub mod inference;
pub mod libre;

pub use google::GoogleTranslator;
pub use inference::InferenceClient;
pub use libre::LibreTranslator;

/// Longest upstream error body echoed back to clients, in characters
const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Chat-completion provider
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the assembled conversation and return the reply text
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, BackendError>;
}

/// Machine-translation provider
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target` language codes
    ///
    /// Codes are passed to the provider as given.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, BackendError>;
}

/// Build the shared HTTP client with the configured request timeout
pub fn http_client(config: &Config) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.server.request_timeout_seconds))
        .user_agent(concat!("cafe-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Construct the translation adapter selected by `translation.provider`
pub fn translator_from_config(config: &Config, http: reqwest::Client) -> Arc<dyn Translator> {
    let timeout_seconds = config.server.request_timeout_seconds;
    let base_url = config.translation.base_url();

    match config.translation.provider {
        TranslationProvider::Google => {
            Arc::new(GoogleTranslator::new(http, base_url, timeout_seconds))
        }
        TranslationProvider::Libre => Arc::new(LibreTranslator::new(
            http,
            base_url,
            config.translation.api_key.clone(),
            timeout_seconds,
        )),
    }
}

/// Extract a readable message from a provider error body
///
/// Understands `{"error": "..."}` and `{"error": {"message": "..."}}`;
/// anything else is returned as trimmed text, truncated.
pub(crate) fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &value["error"];
        if let Some(message) = error.as_str() {
            return message.to_string();
        }
        if let Some(message) = error["message"].as_str() {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    if trimmed.chars().count() > MAX_ERROR_DETAIL_CHARS {
        let truncated: String = trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
        format!("{}...", truncated)
    } else {
        trimmed.to_string()
    }
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

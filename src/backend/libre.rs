//! LibreTranslate-compatible translation API

use super::{Translator, error_detail, join_url};
use crate::config::ApiKey;
use crate::error::BackendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const BACKEND: &str = "libretranslate";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateReply {
    translated_text: String,
}

/// Keyed translation adapter for LibreTranslate and compatible servers
pub struct LibreTranslator {
    http: reqwest::Client,
    url: String,
    api_key: Option<ApiKey>,
    timeout_seconds: u64,
}

impl LibreTranslator {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: Option<ApiKey>,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            http,
            url: join_url(base_url, "translate"),
            api_key,
            timeout_seconds,
        }
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, BackendError> {
        let body = TranslateBody {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_ref().map(ApiKey::expose),
        };

        tracing::debug!(
            url = %self.url,
            source,
            target,
            text_length = text.len(),
            "Sending LibreTranslate request"
        );

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(BACKEND, self.timeout_seconds, e))?;

        let status = response.status();
        let reply_text = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(BACKEND, self.timeout_seconds, e))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                backend: BACKEND,
                status: status.as_u16(),
                detail: error_detail(&reply_text),
            });
        }

        let reply: TranslateReply = serde_json::from_str(&reply_text)
            .map_err(|e| BackendError::malformed(BACKEND, e.to_string()))?;
        Ok(reply.translated_text)
    }
}

//! Google Translate through the free web client endpoint
//!
//! `GET /translate_a/single?client=gtx&dt=t` returns a nested array whose
//! first element lists `[translated, original, ...]` segments.

use super::{Translator, error_detail, join_url};
use crate::error::BackendError;
use async_trait::async_trait;
use serde_json::Value;

const BACKEND: &str = "google-translate";

/// Keyless Google Translate adapter
pub struct GoogleTranslator {
    http: reqwest::Client,
    url: String,
    timeout_seconds: u64,
}

impl GoogleTranslator {
    pub fn new(http: reqwest::Client, base_url: &str, timeout_seconds: u64) -> Self {
        Self {
            http,
            url: join_url(base_url, "translate_a/single"),
            timeout_seconds,
        }
    }
}

/// Concatenate the translated part of every segment
fn parse_segments(body: &Value) -> Result<String, BackendError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| BackendError::malformed(BACKEND, "missing translation segments"))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(BackendError::malformed(
            BACKEND,
            "translation segments contained no text",
        ));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, BackendError> {
        tracing::debug!(
            url = %self.url,
            source,
            target,
            text_length = text.len(),
            "Sending Google translate request"
        );

        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(BACKEND, self.timeout_seconds, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(BACKEND, self.timeout_seconds, e))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                backend: BACKEND,
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| BackendError::malformed(BACKEND, e.to_string()))?;
        parse_segments(&value)
    }
}

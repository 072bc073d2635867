//! Translation relay
//!
//! Handles POST /api/translate by forwarding text to the configured
//! translation backend.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::handlers::extractor::JsonBody;
use crate::metrics::{Backend, Endpoint, Outcome};
use crate::middleware::RequestId;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Source language used when the caller omits one
pub const DEFAULT_SOURCE: &str = "en";
/// Target language used when the caller omits one
pub const DEFAULT_TARGET: &str = "vi";

/// Translation request body as received
#[derive(Debug, Default, Deserialize)]
pub struct RawTranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Validated translation request with language codes resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    text: String,
    source: String,
    target: String,
}

impl TranslateRequest {
    /// Validate and normalize an inbound body
    ///
    /// Missing, null or blank language codes fall back to `en` -> `vi`.
    /// Other codes pass through unchanged.
    ///
    /// # Errors
    ///
    /// [`AppError::MissingField`] when the body is absent or `text` is missing
    /// or blank.
    pub fn from_body(body: Option<RawTranslateRequest>) -> AppResult<Self> {
        let raw = body.ok_or(AppError::MissingField("text"))?;

        let text = raw
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or(AppError::MissingField("text"))?;

        Ok(Self {
            text,
            source: language_or(raw.source, DEFAULT_SOURCE),
            target: language_or(raw.target, DEFAULT_TARGET),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

fn language_or(code: Option<String>, default: &str) -> String {
    code.filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Successful translation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslateResponse {
    pub success: bool,
    pub original: String,
    pub translated: String,
    pub source: String,
    pub target: String,
}

/// POST /api/translate handler
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(body): JsonBody<RawTranslateRequest>,
) -> AppResult<Json<TranslateResponse>> {
    let request = match TranslateRequest::from_body(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected translate request");
            state.record_outcome(request_id, Endpoint::Translate, Outcome::ClientError);
            return Err(e);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        text_length = request.text().len(),
        source = request.source(),
        target = request.target(),
        "Received translate request"
    );

    let started = Instant::now();
    let result = state
        .translator()
        .translate(request.text(), request.source(), request.target())
        .await;
    let duration_ms = state.record_backend_latency(request_id, Backend::Translation, started);

    match result {
        Ok(translated) => {
            tracing::info!(
                request_id = %request_id,
                source = request.source(),
                target = request.target(),
                duration_ms = %duration_ms,
                "Translation completed"
            );
            state.record_outcome(request_id, Endpoint::Translate, Outcome::Success);

            let TranslateRequest {
                text,
                source,
                target,
            } = request;
            Ok(Json(TranslateResponse {
                success: true,
                original: text,
                translated,
                source,
                target,
            }))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                duration_ms = %duration_ms,
                "Translation backend call failed"
            );
            state.record_outcome(request_id, Endpoint::Translate, Outcome::BackendError);
            Err(AppError::Translation(e))
        }
    }
}

//! Error types for cafe-relay
//!
//! Two layers:
//! - [`BackendError`] describes a single failed call to an upstream provider.
//! - [`AppError`] is what handlers and startup code return. It implements
//!   `IntoResponse` and renders the failure envelope shared by every endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Apology shown to chat users when the inference backend fails
pub const CHAT_APOLOGY: &str = "Xin lỗi, tôi đang gặp sự cố. Vui lòng thử lại.";

/// Notice shown when the translation backend fails
pub const TRANSLATION_APOLOGY: &str =
    "Xin lỗi, không thể dịch văn bản lúc này. Vui lòng thử lại.";

/// Notice shown for malformed or incomplete requests
pub const INVALID_REQUEST_MESSAGE: &str = "Yêu cầu không hợp lệ.";

/// Notice shown for failures that are neither client nor backend errors
pub const INTERNAL_ERROR_MESSAGE: &str = "Đã xảy ra lỗi máy chủ.";

/// Failure of one outbound call to an inference or translation provider
///
/// The `Display` output is what clients see in the `error` field.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request to {backend} failed: {source}")]
    Transport {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {backend} timed out after {timeout_seconds} seconds")]
    Timeout {
        backend: &'static str,
        timeout_seconds: u64,
    },

    #[error("{backend} returned HTTP {status}: {detail}")]
    Status {
        backend: &'static str,
        status: u16,
        detail: String,
    },

    #[error("Malformed response from {backend}: {reason}")]
    MalformedResponse {
        backend: &'static str,
        reason: String,
    },
}

impl BackendError {
    /// Classify a reqwest failure, separating timeouts from other transport errors
    pub fn from_reqwest(backend: &'static str, timeout_seconds: u64, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                backend,
                timeout_seconds,
            }
        } else {
            Self::Transport { backend, source }
        }
    }

    /// Shorthand for [`BackendError::MalformedResponse`]
    pub fn malformed(backend: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            backend,
            reason: reason.into(),
        }
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing '{0}' field")]
    MissingField(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Chat backend failed: {0}")]
    Chat(#[source] BackendError),

    #[error("Translation backend failed: {0}")]
    Translation(#[source] BackendError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed user-facing sentence for the envelope's `message` field
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::InvalidBody(_) => INVALID_REQUEST_MESSAGE,
            Self::Chat(_) => CHAT_APOLOGY,
            Self::Translation(_) => TRANSLATION_APOLOGY,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Text for the envelope's `error` field
    ///
    /// Backend failures report the provider error itself, without the
    /// "backend failed" prefix used in logs.
    pub fn detail(&self) -> String {
        match self {
            Self::Chat(e) | Self::Translation(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Failure envelope returned by every endpoint
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    pub message: &'static str,
}

impl From<&AppError> for FailureEnvelope {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            error: err.detail(),
            message: err.user_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(FailureEnvelope::from(&self));
        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

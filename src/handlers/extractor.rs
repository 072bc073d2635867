//! JSON body extractor that reports problems in the failure envelope
//!
//! Axum's `Json` rejects missing content types and empty bodies with its own
//! plain-text responses. [`JsonBody`] instead treats an empty body or a JSON
//! `null` as "no body" (`None`) and turns every other problem into
//! [`AppError::InvalidBody`], so callers always receive the same envelope.

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// Optional JSON request body
///
/// The content type is not checked; any body is parsed as JSON.
pub struct JsonBody<T>(pub Option<T>);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(None));
        }

        serde_json::from_slice::<Option<T>>(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::InvalidBody(e.to_string()))
    }
}

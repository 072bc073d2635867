//! Root status endpoint
//!
//! Describes the service and its operations. Static; no failure modes.

use axum::Json;
use serde::Serialize;

/// Operations advertised by GET /
#[derive(Debug, Serialize)]
pub struct EndpointList {
    pub chatbot: &'static str,
    pub translate: &'static str,
}

/// GET / response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub endpoints: EndpointList,
}

pub async fn handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Coffee Expert Chatbot API is running!",
        endpoints: EndpointList {
            chatbot: "POST /api/chatbot - Coffee expert chatbot",
            translate: "POST /api/translate - Translation service",
        },
    })
}

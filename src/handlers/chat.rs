//! Chat relay
//!
//! Handles POST /api/chatbot: wraps the caller's message and history with the
//! coffee-expert persona and forwards it to the inference backend.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::handlers::extractor::JsonBody;
use crate::metrics::{Backend, Endpoint, Outcome};
use crate::middleware::RequestId;
use crate::models::{ChatTurn, HistoryEntry, assemble_turns};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// System instruction sent ahead of every conversation
pub const COFFEE_EXPERT_PROMPT: &str = "Bạn là chuyên gia tư vấn cafe chuyên nghiệp với nhiều năm kinh nghiệm.
Bạn có kiến thức sâu về các loại hạt cafe, phương pháp pha chế, nguồn gốc cafe, và văn hóa cafe.
Hãy trả lời câu hỏi một cách thân thiện, chuyên nghiệp và chi tiết.
Nếu câu hỏi không liên quan đến cafe, hãy lịch sự chuyển hướng về chủ đề cafe.";

/// Chat request body as received
#[derive(Debug, Default, Deserialize)]
pub struct RawChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<HistoryEntry>>,
}

/// Validated chat request
///
/// Only constructible through [`ChatRequest::from_body`], so `message` is
/// never blank and history roles are already defaulted.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    message: String,
    history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Validate and normalize an inbound body
    ///
    /// # Errors
    ///
    /// [`AppError::MissingField`] when the body is absent or `message` is
    /// missing or blank.
    pub fn from_body(body: Option<RawChatRequest>) -> AppResult<Self> {
        let raw = body.ok_or(AppError::MissingField("message"))?;

        let message = raw
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or(AppError::MissingField("message"))?;

        let history = raw
            .history
            .unwrap_or_default()
            .into_iter()
            .map(HistoryEntry::into_turn)
            .collect();

        Ok(Self { message, history })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Message list for the backend: persona, history, then the new message
    pub fn turns(&self) -> Vec<ChatTurn> {
        assemble_turns(COFFEE_EXPERT_PROMPT, &self.history, &self.message)
    }
}

/// Successful chat reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/chatbot handler
///
/// Makes at most one backend call. Validation failures return 400 without
/// touching the backend; backend failures return 500 with the chat apology.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    JsonBody(body): JsonBody<RawChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let request = match ChatRequest::from_body(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected chat request");
            state.record_outcome(request_id, Endpoint::Chat, Outcome::ClientError);
            return Err(e);
        }
    };

    tracing::debug!(
        request_id = %request_id,
        message_length = request.message().len(),
        history_length = request.history().len(),
        "Received chat request"
    );

    let turns = request.turns();
    let started = Instant::now();
    let result = state.chat_backend().complete(&turns).await;
    let duration_ms = state.record_backend_latency(request_id, Backend::Inference, started);

    match result {
        Ok(reply) => {
            tracing::info!(
                request_id = %request_id,
                reply_length = reply.len(),
                duration_ms = %duration_ms,
                "Chat reply received"
            );
            state.record_outcome(request_id, Endpoint::Chat, Outcome::Success);
            Ok(Json(ChatResponse {
                success: true,
                message: reply,
            }))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                duration_ms = %duration_ms,
                "Chat backend call failed"
            );
            state.record_outcome(request_id, Endpoint::Chat, Outcome::BackendError);
            Err(AppError::Chat(e))
        }
    }
}

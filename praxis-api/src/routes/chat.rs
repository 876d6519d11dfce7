//! Chat Proxy Route
//!
//! Forwards a message list to the configured chat provider and returns
//! the completion. The route exists even when no provider credential is
//! configured; calling it then fails with an internal error rather than
//! a missing route.

use axum::{extract::State, response::IntoResponse, routing::post, Router};
use praxis_core::ChatError;
use praxis_llm::{ChatCompletion, ChatMessage, ChatRequest};
use serde::Deserialize;

use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(chat_completion))
        .with_state(state)
}

/// Body for POST /chat.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ChatCompletionRequest {
    pub messages: Option<Vec<ChatMessage>>,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
}

/// POST /chat - Request one completion from the chat provider
#[utoipa::path(
    post,
    path = "/chat",
    tag = "Chat",
    request_body = ChatCompletionRequest,
    responses(
        (status = 200, description = "Completion", body = Envelope<ChatCompletion>),
        (status = 400, description = "Empty message list", body = ErrorEnvelope),
        (status = 401, description = "Provider rejected the credential", body = ErrorEnvelope),
        (status = 429, description = "Provider quota exhausted", body = ErrorEnvelope),
        (status = 500, description = "Provider unconfigured or request failed", body = ErrorEnvelope),
    ),
)]
pub async fn chat_completion(
    State(state): State<AppState>,
    Json(req): Json<ChatCompletionRequest>,
) -> ApiResult<impl IntoResponse> {
    let provider = state
        .chat
        .clone()
        .ok_or_else(|| ApiError::from(ChatError::ProviderNotConfigured))?;

    let messages: Vec<ChatMessage> = req.messages.unwrap_or_default();
    if messages.is_empty() {
        return Err(ApiError::invalid_input(
            "messages must contain at least one entry",
        ));
    }

    let completion = provider
        .complete(&ChatRequest {
            messages,
            max_tokens: req.max_tokens,
            temperature: req.temperature,
        })
        .await?;

    Ok(Json(Envelope::ok(completion)))
}

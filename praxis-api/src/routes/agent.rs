//! Agent Profile REST API Routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Utc;
use praxis_core::{validate_agent_profile, AgentProfile, NewAgentProfile, ObjectId};
use praxis_store::{Filter, Sort};
use serde::Deserialize;

use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_agent_profiles).post(create_agent_profile))
        .with_state(state)
}

/// Query parameters for GET /agents.
#[derive(Debug, Clone, Deserialize)]
pub struct ListAgentProfilesParams {
    /// Case-insensitive substring match on name
    pub name: Option<String>,
}

/// GET /agents - List agent profiles
#[utoipa::path(
    get,
    path = "/agents",
    tag = "Agents",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive substring match on name"),
    ),
    responses(
        (status = 200, description = "List of agent profiles", body = Envelope<Vec<AgentProfile>>),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn list_agent_profiles(
    State(state): State<AppState>,
    Query(params): Query<ListAgentProfilesParams>,
) -> ApiResult<impl IntoResponse> {
    let mut filter = Filter::new();
    if let Some(name) = params.name {
        filter = filter.contains_ci("name", name);
    }

    let profiles = state
        .agent_profiles
        .find(filter, Some(Sort::desc("created_at")))
        .await?;
    Ok(Json(Envelope::ok(profiles)))
}

/// POST /agents - Create an agent profile
#[utoipa::path(
    post,
    path = "/agents",
    tag = "Agents",
    request_body = NewAgentProfile,
    responses(
        (status = 201, description = "Agent profile created", body = Envelope<AgentProfile>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn create_agent_profile(
    State(state): State<AppState>,
    Json(req): Json<NewAgentProfile>,
) -> ApiResult<impl IntoResponse> {
    let fields = validate_agent_profile(&req).map_err(|e| ApiError::validation_failed(&e))?;

    let now = Utc::now();
    let profile = AgentProfile {
        id: ObjectId::generate(),
        name: fields.name,
        description: fields.description,
        persona: fields.persona,
        created_at: now,
        updated_at: now,
    };
    let stored = state.agent_profiles.insert(&profile).await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(stored))))
}

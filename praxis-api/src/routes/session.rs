//! Session REST API Routes
//!
//! Session records are written with the same upsert machinery as
//! reports. Reads accept either a canonical `_id` or the client-chosen
//! logical `session_id`; the canonical form is tried first, and the
//! logical fallback returns the most recently generated revision.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use chrono::Utc;
use praxis_core::{is_valid_identifier, ObjectId, SessionRecord, SessionTurn};
use praxis_store::{resolve_key, Filter, JsonMap, Sort};
use serde::Deserialize;
use serde_json::json;

use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use crate::routes::natural_key_filter;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", put(upsert_session))
        .route("/:id", get(get_session))
        .with_state(state)
}

/// Body for PUT /sessions.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertSessionRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub session_id: Option<String>,
    pub activity_id: Option<String>,
    pub user_id: Option<String>,
    pub turns: Option<Vec<SessionTurn>>,
}

/// PUT /sessions - Upsert a session record by `_id` or natural key
#[utoipa::path(
    put,
    path = "/sessions",
    tag = "Sessions",
    request_body = UpsertSessionRequest,
    responses(
        (status = 200, description = "Session record written", body = Envelope<SessionRecord>),
        (status = 400, description = "No usable key", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn upsert_session(
    State(state): State<AppState>,
    Json(req): Json<UpsertSessionRequest>,
) -> ApiResult<impl IntoResponse> {
    let natural = natural_key_filter(&req.activity_id, &req.user_id, &req.session_id);
    let key = resolve_key(req.id.as_deref(), natural)?;

    let mut set = JsonMap::new();
    if let Some(session_id) = &req.session_id {
        set.insert("session_id".to_string(), json!(session_id));
    }
    if let Some(activity_id) = &req.activity_id {
        set.insert("activity_id".to_string(), json!(activity_id));
    }
    if let Some(user_id) = &req.user_id {
        set.insert("user_id".to_string(), json!(user_id));
    }
    set.insert(
        "turns".to_string(),
        serde_json::to_value(req.turns.unwrap_or_default())?,
    );
    set.insert("generated_at".to_string(), serde_json::to_value(Utc::now())?);

    let stored = state.sessions.upsert(&key, set).await?;
    Ok(Json(Envelope::ok(stored)))
}

/// GET /sessions/{id} - Get a session by canonical or logical identifier
///
/// A well-formed 24-hex value is first tried as a canonical `_id`; on
/// miss (or for any other shape) it is treated as a logical
/// `session_id`, returning the newest matching revision.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "Sessions",
    params(
        ("id" = String, Path, description = "Canonical _id or logical session_id")
    ),
    responses(
        (status = 200, description = "Session record", body = Envelope<SessionRecord>),
        (status = 404, description = "Session not found", body = ErrorEnvelope),
    ),
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if is_valid_identifier(&id) {
        if let Ok(parsed) = ObjectId::parse(&id) {
            if let Some(record) = state.sessions.get(&parsed).await? {
                return Ok(Json(Envelope::ok(record)));
            }
        }
    }

    let record = state
        .sessions
        .find_one(
            Filter::new().eq("session_id", id.clone()),
            Some(Sort::desc("generated_at")),
        )
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Session", &id))?;
    Ok(Json(Envelope::ok(record)))
}

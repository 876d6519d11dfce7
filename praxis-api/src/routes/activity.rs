//! Activity REST API Routes
//!
//! Activities are created server-side with an empty memory list, an
//! `in_progress` status and a server-assigned start time; the client
//! supplies only the name and the identifiers it links.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use praxis_core::{validate_activity, Activity, ActivityStatus, NewActivity, ObjectId};
use praxis_store::{Filter, Sort};
use serde::Deserialize;

use crate::envelope::{Envelope, ErrorEnvelope};
use crate::extract::Json;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .with_state(state)
}

/// Query parameters for GET /activities.
#[derive(Debug, Clone, Deserialize)]
pub struct ListActivitiesParams {
    /// Filter by lifecycle status
    pub status: Option<ActivityStatus>,
    /// Inclusive lower bound on start_time
    pub start_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start_time
    pub start_before: Option<DateTime<Utc>>,
}

/// GET /activities - List activities, newest first
#[utoipa::path(
    get,
    path = "/activities",
    tag = "Activities",
    params(
        ("status" = Option<String>, Query, description = "Filter by status (in_progress, completed, abandoned)"),
        ("start_after" = Option<String>, Query, description = "Inclusive lower bound on start_time (RFC 3339)"),
        ("start_before" = Option<String>, Query, description = "Inclusive upper bound on start_time (RFC 3339)"),
    ),
    responses(
        (status = 200, description = "List of activities", body = Envelope<Vec<Activity>>),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<ListActivitiesParams>,
) -> ApiResult<impl IntoResponse> {
    let mut filter = Filter::new();
    if let Some(status) = params.status {
        filter = filter.eq("status", serde_json::to_value(status)?);
    }
    if let Some(after) = params.start_after {
        filter = filter.gte("start_time", serde_json::to_value(after)?);
    }
    if let Some(before) = params.start_before {
        filter = filter.lte("start_time", serde_json::to_value(before)?);
    }

    let activities = state
        .activities
        .find(filter, Some(Sort::desc("start_time")))
        .await?;
    Ok(Json(Envelope::ok(activities)))
}

/// POST /activities - Create an activity
#[utoipa::path(
    post,
    path = "/activities",
    tag = "Activities",
    request_body = NewActivity,
    responses(
        (status = 201, description = "Activity created", body = Envelope<Activity>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<NewActivity>,
) -> ApiResult<impl IntoResponse> {
    let fields = validate_activity(&req).map_err(|e| ApiError::validation_failed(&e))?;

    let activity = Activity {
        id: ObjectId::generate(),
        name: fields.name,
        course_package_id: fields.course_package_id,
        agent_profile_id: fields.agent_profile_id,
        current_unit_id: fields.current_unit_id,
        memory_ids: Vec::new(),
        start_time: Utc::now(),
        status: ActivityStatus::InProgress,
    };
    let stored = state.activities.insert(&activity).await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok(stored))))
}

//! Interaction Report REST API Routes
//!
//! Reports are addressed two ways: by canonical `_id`, or by the
//! compound natural key (activity_id, user_id, session_id). The PUT
//! route is a true upsert: replaying the same natural key rewrites the
//! single existing report instead of accumulating duplicates, and
//! payload fields omitted from a replay reset to their defaults while
//! keyed fields are held constant.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use chrono::Utc;
use praxis_core::{is_valid_identifier, InteractionReport, ObjectId, UnitResult};
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
        .route("/", get(list_reports).put(upsert_report))
        .route("/:id", get(get_report).patch(patch_report))
        .with_state(state)
}

// ============================================================================
// TYPES
// ============================================================================

/// Query parameters for GET /reports.
#[derive(Debug, Clone, Deserialize)]
pub struct ListReportsParams {
    pub activity_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Body for PUT /reports.
///
/// Either `_id` (well-formed) or the complete natural key must be
/// present; everything else is payload.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertReportRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub activity_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub user_name: Option<String>,
    pub summary: Option<String>,
    pub unit_results: Option<Vec<UnitResult>>,
}

/// Body for PATCH /reports/{id}. At least one field must be present.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PatchReportRequest {
    pub user_name: Option<String>,
    pub summary: Option<String>,
    pub unit_results: Option<Vec<UnitResult>>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /reports - List reports, most recently generated first
#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    params(
        ("activity_id" = Option<String>, Query, description = "Exact match on activity_id"),
        ("user_id" = Option<String>, Query, description = "Exact match on user_id"),
        ("session_id" = Option<String>, Query, description = "Exact match on session_id"),
    ),
    responses(
        (status = 200, description = "List of reports", body = Envelope<Vec<InteractionReport>>),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListReportsParams>,
) -> ApiResult<impl IntoResponse> {
    let mut filter = Filter::new();
    if let Some(activity_id) = params.activity_id {
        filter = filter.eq("activity_id", activity_id);
    }
    if let Some(user_id) = params.user_id {
        filter = filter.eq("user_id", user_id);
    }
    if let Some(session_id) = params.session_id {
        filter = filter.eq("session_id", session_id);
    }

    let reports = state
        .reports
        .find(filter, Some(Sort::desc("generated_at")))
        .await?;
    Ok(Json(Envelope::ok(reports)))
}

/// GET /reports/{id} - Get a report by canonical identifier
#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "Reports",
    params(
        ("id" = String, Path, description = "Report identifier (24-character hex)")
    ),
    responses(
        (status = 200, description = "Report", body = Envelope<InteractionReport>),
        (status = 400, description = "Malformed identifier", body = ErrorEnvelope),
        (status = 404, description = "Report not found", body = ErrorEnvelope),
    ),
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_report_id(&id)?;
    let report = state
        .reports
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Report", &id))?;
    Ok(Json(Envelope::ok(report)))
}

/// PUT /reports - Upsert a report by `_id` or natural key
#[utoipa::path(
    put,
    path = "/reports",
    tag = "Reports",
    request_body = UpsertReportRequest,
    responses(
        (status = 200, description = "Report written", body = Envelope<InteractionReport>),
        (status = 400, description = "No usable key", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn upsert_report(
    State(state): State<AppState>,
    Json(req): Json<UpsertReportRequest>,
) -> ApiResult<impl IntoResponse> {
    let natural = natural_key_filter(&req.activity_id, &req.user_id, &req.session_id);
    let key = resolve_key(req.id.as_deref(), natural)?;

    // Keyed fields enter the write only when supplied; payload fields
    // always enter it, so a replay that omits one resets it.
    let mut set = JsonMap::new();
    if let Some(activity_id) = &req.activity_id {
        set.insert("activity_id".to_string(), json!(activity_id));
    }
    if let Some(user_id) = &req.user_id {
        set.insert("user_id".to_string(), json!(user_id));
    }
    if let Some(session_id) = &req.session_id {
        set.insert("session_id".to_string(), json!(session_id));
    }
    set.insert(
        "user_name".to_string(),
        json!(req.user_name.unwrap_or_default()),
    );
    set.insert(
        "summary".to_string(),
        json!(req.summary.unwrap_or_default()),
    );
    set.insert(
        "unit_results".to_string(),
        serde_json::to_value(req.unit_results.unwrap_or_default())?,
    );
    set.insert("generated_at".to_string(), serde_json::to_value(Utc::now())?);

    let stored = state.reports.upsert(&key, set).await?;
    Ok(Json(Envelope::ok(stored)))
}

/// PATCH /reports/{id} - Partially update a report
#[utoipa::path(
    patch,
    path = "/reports/{id}",
    tag = "Reports",
    params(
        ("id" = String, Path, description = "Report identifier (24-character hex)")
    ),
    request_body = PatchReportRequest,
    responses(
        (status = 200, description = "Report updated", body = Envelope<InteractionReport>),
        (status = 400, description = "Malformed identifier or empty patch", body = ErrorEnvelope),
        (status = 404, description = "Report not found", body = ErrorEnvelope),
    ),
)]
pub async fn patch_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PatchReportRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_report_id(&id)?;

    let mut set = JsonMap::new();
    if let Some(user_name) = req.user_name {
        set.insert("user_name".to_string(), json!(user_name));
    }
    if let Some(summary) = req.summary {
        set.insert("summary".to_string(), json!(summary));
    }
    if let Some(unit_results) = req.unit_results {
        set.insert("unit_results".to_string(), serde_json::to_value(unit_results)?);
    }
    if set.is_empty() {
        return Err(ApiError::invalid_input(
            "At least one updatable field must be provided",
        ));
    }
    set.insert("generated_at".to_string(), serde_json::to_value(Utc::now())?);

    let updated = state
        .reports
        .update_one(Filter::new().eq("_id", id.to_string()), set)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Report", &id))?;
    Ok(Json(Envelope::ok(updated)))
}

fn parse_report_id(raw: &str) -> ApiResult<ObjectId> {
    if !is_valid_identifier(raw) {
        return Err(ApiError::invalid_format(
            "id",
            "a 24-character lowercase hex identifier",
        ));
    }
    ObjectId::parse(raw)
        .map_err(|_| ApiError::invalid_format("id", "a 24-character lowercase hex identifier"))
}

//! Health and Store Connectivity Endpoints
//!
//! - /health - liveness with version and uptime
//! - /db/test - store ping, with optional index re-initialization

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::ApiResult;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new().route("/", get(health)).with_state(state)
}

pub fn db_router(state: AppState) -> Router {
    Router::new().route("/test", get(db_test)).with_state(state)
}

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Store connectivity response
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DbTestResponse {
    pub ok: bool,
    /// Whether indexes were (re-)ensured by this call
    pub initialized: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbTestParams {
    pub init: Option<bool>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health - Process liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = Envelope<HealthResponse>),
    ),
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };
    Json(Envelope::ok(response))
}

/// GET /db/test - Store connectivity check
#[utoipa::path(
    get,
    path = "/db/test",
    tag = "Health",
    params(
        ("init" = Option<bool>, Query, description = "Also re-ensure all collection indexes"),
    ),
    responses(
        (status = 200, description = "Store is reachable", body = Envelope<DbTestResponse>),
        (status = 500, description = "Store is unreachable", body = ErrorEnvelope),
    ),
)]
pub async fn db_test(
    State(state): State<AppState>,
    Query(params): Query<DbTestParams>,
) -> ApiResult<impl IntoResponse> {
    state.backend.ping().await?;

    let initialized = params.init.unwrap_or(false);
    if initialized {
        state.ensure_indexes().await?;
    }

    Ok(Json(Envelope::ok(DbTestResponse {
        ok: true,
        initialized,
    })))
}

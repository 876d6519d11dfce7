//! REST API Routes Module
//!
//! This module contains all REST API route handlers organized by entity
//! type, plus the top-level router assembly:
//! - Entity routes (course packages, agents, activities, sessions, reports)
//! - Chat proxy
//! - Health and store connectivity endpoints
//! - OpenAPI spec at /openapi.json
//! - CORS support for browser-based clients

pub mod activity;
pub mod agent;
pub mod chat;
pub mod course_package;
pub mod health;
pub mod report;
pub mod session;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use praxis_store::Filter;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Equality filter over the compound natural key, or `None` when any
/// component is absent. A partial key never narrows a write.
pub(crate) fn natural_key_filter(
    activity_id: &Option<String>,
    user_id: &Option<String>,
    session_id: &Option<String>,
) -> Option<Filter> {
    match (activity_id, user_id, session_id) {
        (Some(activity_id), Some(user_id), Some(session_id)) => Some(
            Filter::new()
                .eq("activity_id", activity_id.clone())
                .eq("user_id", user_id.clone())
                .eq("session_id", session_id.clone()),
        ),
        _ => None,
    }
}

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Fallback for unmatched paths: a 404 failure envelope.
async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Create the complete API router.
///
/// Routes:
/// - /course-packages, /agents, /activities, /sessions, /reports, /chat
/// - /health and /db/test (no entity state beyond the backend handle)
/// - /openapi.json
///
/// Every response, including the 404 fallback, is a JSON envelope.
pub fn create_api_router(state: AppState, config: &ApiConfig) -> Router {
    let cors = build_cors_layer(config);

    Router::new()
        .nest(
            "/course-packages",
            course_package::create_router(state.clone()),
        )
        .nest("/agents", agent::create_router(state.clone()))
        .nest("/activities", activity::create_router(state.clone()))
        .nest("/sessions", session::create_router(state.clone()))
        .nest("/reports", report::create_router(state.clone()))
        .nest("/chat", chat::create_router(state.clone()))
        .nest("/health", health::create_router(state.clone()))
        .nest("/db", health::db_router(state))
        .route("/openapi.json", get(openapi_json))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

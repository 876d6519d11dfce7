//! Course Package REST API Routes
//!
//! Course packages and their units live in separate collections; list
//! responses stitch units back in on demand via `include_units`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use praxis_core::{validate_course_package, CoursePackage, NewCoursePackage, ObjectId, Unit};
use praxis_store::{Filter, Sort};
use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, ErrorEnvelope};
use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(list_course_packages).post(create_course_package),
        )
        .with_state(state)
}

// ============================================================================
// TYPES
// ============================================================================

/// Query parameters for GET /course-packages.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCoursePackagesParams {
    /// Case-insensitive substring match on title
    pub title: Option<String>,
    /// Inclusive lower bound on created_at
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on created_at
    pub created_before: Option<DateTime<Utc>>,
    /// Attach each package's units, sorted by order
    pub include_units: Option<bool>,
}

/// A course package, optionally with its units attached.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CoursePackageView {
    #[serde(flatten)]
    pub package: CoursePackage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<Unit>>,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /course-packages - List course packages with filters
#[utoipa::path(
    get,
    path = "/course-packages",
    tag = "Course Packages",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive substring match on title"),
        ("created_after" = Option<String>, Query, description = "Inclusive lower bound on created_at (RFC 3339)"),
        ("created_before" = Option<String>, Query, description = "Inclusive upper bound on created_at (RFC 3339)"),
        ("include_units" = Option<bool>, Query, description = "Attach units to each package"),
    ),
    responses(
        (status = 200, description = "List of course packages", body = Envelope<Vec<CoursePackageView>>),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn list_course_packages(
    State(state): State<AppState>,
    Query(params): Query<ListCoursePackagesParams>,
) -> ApiResult<impl IntoResponse> {
    let mut filter = Filter::new();
    if let Some(title) = params.title {
        filter = filter.contains_ci("title", title);
    }
    if let Some(after) = params.created_after {
        filter = filter.gte("created_at", serde_json::to_value(after)?);
    }
    if let Some(before) = params.created_before {
        filter = filter.lte("created_at", serde_json::to_value(before)?);
    }

    let packages = state
        .course_packages
        .find(filter, Some(Sort::desc("created_at")))
        .await?;

    let include_units = params.include_units.unwrap_or(false);
    let mut views = Vec::with_capacity(packages.len());
    for package in packages {
        let units = if include_units {
            Some(units_of(&state, &package.id).await?)
        } else {
            None
        };
        views.push(CoursePackageView { package, units });
    }

    Ok(Json(Envelope::ok(views)))
}

/// POST /course-packages - Create a course package with embedded units
#[utoipa::path(
    post,
    path = "/course-packages",
    tag = "Course Packages",
    request_body = NewCoursePackage,
    responses(
        (status = 201, description = "Course package created", body = Envelope<CoursePackageView>),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope),
    ),
)]
pub async fn create_course_package(
    State(state): State<AppState>,
    Json(req): Json<NewCoursePackage>,
) -> ApiResult<impl IntoResponse> {
    let fields = validate_course_package(&req).map_err(|e| ApiError::validation_failed(&e))?;

    let now = Utc::now();
    let package = CoursePackage {
        id: ObjectId::generate(),
        title: fields.title,
        description: fields.description,
        created_at: now,
        updated_at: now,
    };
    let stored = state.course_packages.insert(&package).await?;

    let mut units = Vec::with_capacity(fields.units.len());
    for unit in fields.units {
        let stored_unit = state
            .units
            .insert(&Unit {
                id: ObjectId::generate(),
                course_package_id: stored.id.clone(),
                title: unit.title,
                content: unit.content,
                order: unit.order,
                created_at: now,
            })
            .await?;
        units.push(stored_unit);
    }
    units.sort_by_key(|u| u.order);

    let view = CoursePackageView {
        package: stored,
        units: Some(units),
    };
    Ok((StatusCode::CREATED, Json(Envelope::ok(view))))
}

/// Units of one package, sorted by their explicit order.
async fn units_of(state: &AppState, package_id: &ObjectId) -> ApiResult<Vec<Unit>> {
    let units = state
        .units
        .find(
            Filter::new().eq("course_package_id", package_id.to_string()),
            Some(Sort::asc("order")),
        )
        .await?;
    Ok(units)
}

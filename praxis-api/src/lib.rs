//! Praxis API - REST Layer
//!
//! Axum HTTP surface over the document store and chat provider:
//! envelope-wrapped JSON responses, per-entity route modules, error to
//! status-code mapping, and an OpenAPI document.

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, COLLECTIONS};

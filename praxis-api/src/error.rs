//! Error Types for the Praxis API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! Errors are serialized as failure envelopes with appropriate HTTP
//! status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use praxis_core::{ChatError, FieldError, StoreError};
use praxis_store::MissingKeyError;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::envelope::Envelope;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code and represents
/// a category of error that can occur during API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    /// Field format is incorrect
    InvalidFormat,

    /// Write request carries neither a usable canonical id nor a
    /// complete natural key
    MissingKey,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested entity does not exist
    EntityNotFound,

    /// Requested route does not exist
    RouteNotFound,

    // ========================================================================
    // Method Errors (405)
    // ========================================================================
    /// HTTP method not supported on this route
    MethodNotAllowed,

    // ========================================================================
    // Upstream Provider Errors (429, 401)
    // ========================================================================
    /// Chat provider reported quota exhaustion
    ProviderRateLimited,

    /// Chat provider rejected the configured credential
    ProviderUnauthorized,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Document store operation failed
    StoreFailure,

    /// Chat provider call failed
    ProviderFailure,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Validation errors
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField
            | ErrorCode::InvalidFormat
            | ErrorCode::MissingKey => StatusCode::BAD_REQUEST,

            // Not found errors
            ErrorCode::EntityNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // Upstream provider errors
            ErrorCode::ProviderRateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::ProviderUnauthorized => StatusCode::UNAUTHORIZED,

            // Server errors
            ErrorCode::InternalError
            | ErrorCode::StoreFailure
            | ErrorCode::ProviderFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            // Validation
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::MissingKey => {
                "Request must carry a well-formed _id or a complete natural key"
            }

            // Not Found
            ErrorCode::EntityNotFound => "Entity not found",
            ErrorCode::RouteNotFound => "Route not found",

            ErrorCode::MethodNotAllowed => "Method not allowed",

            // Upstream
            ErrorCode::ProviderRateLimited => "Chat provider rate limit exceeded",
            ErrorCode::ProviderUnauthorized => "Chat provider rejected the API credential",

            // Server
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreFailure => "Storage operation failed",
            ErrorCode::ProviderFailure => "Chat provider request failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error for API operations.
///
/// Returned by every handler on failure and rendered as a failure
/// envelope: `error` is the short human-readable headline, `message`
/// optionally carries detail such as joined per-field validation
/// messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error headline
    pub error: String,

    /// Optional detail (joined field errors, provider messages)
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error with the given code and headline.
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            code,
            error: error.into(),
            message: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            error: code.default_message().to_string(),
            message: None,
        }
    }

    /// Attach a detail message to the error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create a ValidationFailed error carrying the joined field errors.
    pub fn validation_failed(errors: &[FieldError]) -> Self {
        Self::from_code(ErrorCode::ValidationFailed)
            .with_message(praxis_core::format_errors(errors))
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    /// Create an InvalidFormat error.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format, expected {}", field, expected),
        )
    }

    /// Create a MissingKey error.
    pub fn missing_key() -> Self {
        Self::from_code(ErrorCode::MissingKey)
    }

    /// Create an EntityNotFound error.
    pub fn entity_not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityNotFound,
            format!("{} with id {} not found", entity_type, id),
        )
    }

    /// Create a generic not found error with custom message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EntityNotFound, message)
    }

    /// Create a RouteNotFound error.
    pub fn route_not_found() -> Self {
        Self::from_code(ErrorCode::RouteNotFound)
    }

    /// Create a MethodNotAllowed error.
    pub fn method_not_allowed() -> Self {
        Self::from_code(ErrorCode::MethodNotAllowed)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a StoreFailure error.
    pub fn store_failure() -> Self {
        Self::from_code(ErrorCode::StoreFailure)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.error)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Implement IntoResponse for ApiError to enable automatic error handling in Axum.
///
/// This allows ApiError to be returned directly from Axum handlers:
/// ```ignore
/// async fn handler() -> Result<Json<Response>, ApiError> {
///     Err(ApiError::missing_key())
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(Envelope::<()>::failure(self.error, self.message));
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM STANDARD ERRORS
// ============================================================================

/// Convert from StoreError to ApiError.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the full error for debugging
        tracing::error!("Store error: {:?}", err);

        // Return a generic store error to avoid leaking internal details
        ApiError::store_failure()
    }
}

/// Convert from ChatError to ApiError, preserving the quota/auth split.
impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::ProviderNotConfigured => ApiError::new(
                ErrorCode::InternalError,
                "Chat provider credential is not configured",
            ),
            ChatError::RateLimited { .. } => {
                ApiError::from_code(ErrorCode::ProviderRateLimited)
            }
            ChatError::InvalidApiKey { .. } => {
                ApiError::from_code(ErrorCode::ProviderUnauthorized)
            }
            ChatError::RequestFailed { ref message, .. } => {
                tracing::error!("Chat provider request failed: {}", err);
                ApiError::from_code(ErrorCode::ProviderFailure).with_message(message.clone())
            }
            ChatError::InvalidResponse { .. } => {
                tracing::error!("Chat provider response invalid: {}", err);
                ApiError::from_code(ErrorCode::ProviderFailure)
            }
        }
    }
}

/// Convert from MissingKeyError to ApiError.
impl From<MissingKeyError> for ApiError {
    fn from(_: MissingKeyError) -> Self {
        ApiError::missing_key()
    }
}

/// Convert from serde_json::Error to ApiError.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
///
/// This is the standard result type used throughout the API layer.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(
            ErrorCode::ValidationFailed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::MissingKey.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::EntityNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorCode::ProviderRateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::ProviderUnauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::StoreFailure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_constructors() {
        let err = ApiError::entity_not_found("Report", "0123456789abcdef01234567");
        assert_eq!(err.code, ErrorCode::EntityNotFound);
        assert!(err.error.contains("Report"));
        assert!(err.error.contains("0123456789abcdef01234567"));

        let err = ApiError::missing_field("name");
        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.error.contains("name"));
    }

    #[test]
    fn test_validation_failed_joins_field_errors() {
        let errors = vec![
            FieldError::required("name"),
            FieldError::bad_identifier("course_package_id"),
        ];
        let err = ApiError::validation_failed(&errors);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let message = err.message.unwrap();
        assert!(message.contains("name"));
        assert!(message.contains("course_package_id"));
    }

    #[test]
    fn test_chat_error_mapping() {
        let err = ApiError::from(ChatError::RateLimited {
            provider: "anthropic".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);

        let err = ApiError::from(ChatError::InvalidApiKey {
            provider: "anthropic".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = ApiError::from(ChatError::ProviderNotConfigured);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_is_not_leaked() {
        let err = ApiError::from(StoreError::ConnectionFailed {
            reason: "secret dsn".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.error.contains("secret dsn"));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::missing_key();
        let display = format!("{}", err);
        assert!(display.contains("MissingKey"));
    }
}

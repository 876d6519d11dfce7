//! Response Envelope
//!
//! Every JSON response from the API shares one wrapper shape:
//! `{success, data?, error?, message?}`. Success responses carry `data`;
//! failure responses carry `error` (headline) and optionally `message`
//! (detail). Absent fields are omitted from the serialized body rather
//! than sent as null.

use serde::{Deserialize, Serialize};

/// Uniform wrapper for every API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Envelope<T> {
    /// Whether the request succeeded
    pub success: bool,

    /// Payload of a successful response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable error headline on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Optional error detail, e.g. joined per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Wrap a payload in a success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Build a failure envelope.
    pub fn failure(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message,
        }
    }
}

/// Failure envelope shape as rendered by
/// [`ApiError`](crate::error::ApiError). Exists for OpenAPI
/// documentation of error responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_omits_error_fields() {
        let envelope = Envelope::ok(vec![1, 2, 3]);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert!(value.get("error").is_none());
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let envelope =
            Envelope::<()>::failure("Request validation failed", Some("name: is required".into()));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Request validation failed");
        assert_eq!(value["message"], "name: is required");
        assert!(value.get("data").is_none());
    }
}

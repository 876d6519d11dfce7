//! Error types for Praxis operations

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Insert failed in {collection}: {reason}")]
    InsertFailed { collection: String, reason: String },

    #[error("Update failed in {collection}: {reason}")]
    UpdateFailed { collection: String, reason: String },

    #[error("Index error on {index_name}: {reason}")]
    IndexError { index_name: String, reason: String },

    #[error("Unique index violation on {index_name}")]
    UniqueViolation { index_name: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Document serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Chat provider errors, subdivided so the API layer can map
/// quota/auth failures to their own status codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("No chat provider configured")]
    ProviderNotConfigured,

    #[error("Rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("Invalid API key for {provider}")]
    InvalidApiKey { provider: String },

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Master error type for Praxis operations.
#[derive(Debug, Clone, Error)]
pub enum PraxisError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
}

/// Result type alias for Praxis operations.
pub type PraxisResult<T> = Result<T, PraxisError>;

//! Async document-store backend contract
//!
//! The persistence engine is deliberately opaque: anything that can
//! find, insert, and atomically update-or-insert single JSON documents
//! can sit behind [`DocumentBackend`]. The rest of the system never
//! assumes more than that.

use async_trait::async_trait;
use praxis_core::StoreError;
use serde_json::Value;

use crate::query::{Filter, Sort};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// JSON object used for field-set payloads.
pub type JsonMap = serde_json::Map<String, Value>;

/// A named index a collection depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub unique: bool,
}

/// Static description of one collection and its required indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub indexes: &'static [IndexSpec],
}

/// Async contract every backing store must satisfy.
///
/// Single-document atomicity is the one hard requirement:
/// `find_one_and_update` must locate, write, and read back under one
/// atomic step, because the upsert resolver's correctness depends on it.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Cheap liveness check of the store connection.
    async fn ping(&self) -> StoreResult<()>;

    /// Idempotently ensure an index exists. Safe to call repeatedly.
    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> StoreResult<()>;

    /// Insert a document, generating an `_id` when absent. Returns the
    /// stored document.
    async fn insert(&self, collection: &str, document: Value) -> StoreResult<Value>;

    /// All documents matching `filter`, in `sort` order (stable; ties
    /// keep insertion order).
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Vec<Value>>;

    /// First document matching `filter` under `sort`.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Value>>;

    /// Atomically locate one document matching `filter` and overwrite its
    /// top-level fields with `set` (fields absent from `set` keep their
    /// stored values; `_id` is never rewritten). With `upsert`, a missing
    /// match is inserted from `set` instead, taking `_id` from the
    /// filter's `_id` equality when it pins one. Returns the stored
    /// document after the write, or `None` when nothing matched and
    /// `upsert` was false.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        set: JsonMap,
        upsert: bool,
    ) -> StoreResult<Option<Value>>;
}

//! In-memory document backend
//!
//! Reference [`DocumentBackend`] implementation used by tests and
//! single-process deployments. Each collection is a vector of JSON
//! documents behind an `RwLock`; `find_one_and_update` holds the write
//! lock across locate, write and read-back, which is exactly the
//! single-document atomicity the upsert resolver requires. Writes to
//! different collections never block each other.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use praxis_core::{ObjectId, StoreError};
use serde_json::Value;

use crate::backend::{CollectionSpec, DocumentBackend, IndexSpec, JsonMap, StoreResult};
use crate::query::{Filter, Sort};

struct CollectionState {
    indexes: &'static [IndexSpec],
    ensured: RwLock<HashSet<&'static str>>,
    documents: RwLock<Vec<Value>>,
}

/// In-memory backend over a fixed set of collections.
pub struct MemoryBackend {
    collections: HashMap<&'static str, CollectionState>,
}

impl MemoryBackend {
    pub fn new(specs: &'static [CollectionSpec]) -> Self {
        let collections = specs
            .iter()
            .map(|spec| {
                (
                    spec.name,
                    CollectionState {
                        indexes: spec.indexes,
                        ensured: RwLock::new(HashSet::new()),
                        documents: RwLock::new(Vec::new()),
                    },
                )
            })
            .collect();
        Self { collections }
    }

    fn state(&self, collection: &str) -> StoreResult<&CollectionState> {
        self.collections
            .get(collection)
            .ok_or_else(|| StoreError::ConnectionFailed {
                reason: format!("unknown collection '{}'", collection),
            })
    }

    /// Check `candidate` against every unique index of the collection.
    /// `skip` excludes one position (the document being replaced).
    fn check_unique(
        state: &CollectionState,
        documents: &[Value],
        candidate: &Value,
        skip: Option<usize>,
    ) -> StoreResult<()> {
        for index in state.indexes.iter().filter(|i| i.unique) {
            let collides = documents.iter().enumerate().any(|(position, existing)| {
                if Some(position) == skip {
                    return false;
                }
                index
                    .fields
                    .iter()
                    .all(|field| existing.get(*field) == candidate.get(*field))
            });
            if collides {
                return Err(StoreError::UniqueViolation {
                    index_name: index.name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn sorted(mut documents: Vec<Value>, sort: Option<&Sort>) -> Vec<Value> {
        if let Some(sort) = sort {
            documents.sort_by(|a, b| sort.compare(a, b));
        }
        documents
    }
}

fn as_object(document: Value, collection: &str) -> StoreResult<JsonMap> {
    match document {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InsertFailed {
            collection: collection.to_string(),
            reason: format!("document must be a JSON object, got {}", other),
        }),
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> StoreResult<()> {
        let state = self.state(collection)?;
        let known = state.indexes.iter().any(|i| i.name == index.name);
        if !known {
            return Err(StoreError::IndexError {
                index_name: index.name.to_string(),
                reason: format!("not declared for collection '{}'", collection),
            });
        }
        state
            .ensured
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(index.name);
        Ok(())
    }

    async fn insert(&self, collection: &str, document: Value) -> StoreResult<Value> {
        let state = self.state(collection)?;
        let mut map = as_object(document, collection)?;
        if !map.contains_key("_id") {
            map.insert(
                "_id".to_string(),
                Value::String(ObjectId::generate().to_string()),
            );
        }
        let document = Value::Object(map);

        let mut documents = state
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        Self::check_unique(state, &documents, &document, None)?;
        documents.push(document.clone());
        Ok(document)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Vec<Value>> {
        let state = self.state(collection)?;
        let documents = state
            .documents
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        let matching: Vec<Value> = documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        Ok(Self::sorted(matching, sort))
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Option<Value>> {
        Ok(self.find(collection, filter, sort).await?.into_iter().next())
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        set: JsonMap,
        upsert: bool,
    ) -> StoreResult<Option<Value>> {
        let state = self.state(collection)?;
        let mut documents = state
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;

        let position = documents.iter().position(|doc| filter.matches(doc));

        match position {
            Some(position) => {
                let mut updated = match &documents[position] {
                    Value::Object(map) => map.clone(),
                    _ => {
                        return Err(StoreError::UpdateFailed {
                            collection: collection.to_string(),
                            reason: "stored document is not an object".to_string(),
                        })
                    }
                };
                for (field, value) in set {
                    if field != "_id" {
                        updated.insert(field, value);
                    }
                }
                let updated = Value::Object(updated);
                Self::check_unique(state, &documents, &updated, Some(position))?;
                documents[position] = updated.clone();
                Ok(Some(updated))
            }
            None if upsert => {
                let mut map = set;
                // Equality conditions carry into the inserted document,
                // so key fields survive even when the payload omits them.
                for condition in filter.conditions() {
                    if let Some(value) = filter.eq_value(&condition.field) {
                        map.entry(condition.field.clone())
                            .or_insert_with(|| value.clone());
                    }
                }
                if !map.contains_key("_id") {
                    map.insert(
                        "_id".to_string(),
                        Value::String(ObjectId::generate().to_string()),
                    );
                }
                let document = Value::Object(map);
                Self::check_unique(state, &documents, &document, None)?;
                documents.push(document.clone());
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static SPECS: &[CollectionSpec] = &[
        CollectionSpec {
            name: "things",
            indexes: &[IndexSpec {
                name: "things_key_unique",
                fields: &["a", "b"],
                unique: true,
            }],
        },
        CollectionSpec {
            name: "plain",
            indexes: &[],
        },
    ];

    fn backend() -> MemoryBackend {
        MemoryBackend::new(SPECS)
    }

    #[tokio::test]
    async fn test_insert_generates_id() {
        let backend = backend();
        let stored = backend
            .insert("plain", json!({"name": "x"}))
            .await
            .unwrap();
        let id = stored.get("_id").and_then(Value::as_str).unwrap();
        assert!(praxis_core::is_valid_identifier(id));
    }

    #[tokio::test]
    async fn test_unknown_collection_rejected() {
        let backend = backend();
        let err = backend.insert("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::ConnectionFailed { .. }));
    }

    #[tokio::test]
    async fn test_find_with_filter_and_sort() {
        let backend = backend();
        for (name, n) in [("alpha", 3), ("beta", 1), ("gamma", 2)] {
            backend
                .insert("plain", json!({"name": name, "n": n}))
                .await
                .unwrap();
        }
        let found = backend
            .find(
                "plain",
                &Filter::new().gte("n", 2),
                Some(&Sort::desc("n")),
            )
            .await
            .unwrap();
        let names: Vec<&str> = found
            .iter()
            .map(|d| d.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, vec!["alpha", "gamma"]);
    }

    #[tokio::test]
    async fn test_stable_sort_keeps_insertion_order_on_ties() {
        let backend = backend();
        for name in ["first", "second", "third"] {
            backend
                .insert("plain", json!({"name": name, "order": 1}))
                .await
                .unwrap();
        }
        let found = backend
            .find("plain", &Filter::new(), Some(&Sort::asc("order")))
            .await
            .unwrap();
        let names: Vec<&str> = found
            .iter()
            .map(|d| d.get("name").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_update_overwrites_supplied_and_keeps_missing() {
        let backend = backend();
        backend
            .insert("plain", json!({"name": "x", "kept": "yes", "summary": "old"}))
            .await
            .unwrap();

        let mut set = JsonMap::new();
        set.insert("summary".to_string(), json!("new"));
        let updated = backend
            .find_one_and_update("plain", &Filter::new().eq("name", "x"), set, false)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.get("summary"), Some(&json!("new")));
        assert_eq!(updated.get("kept"), Some(&json!("yes")));
    }

    #[tokio::test]
    async fn test_update_without_upsert_returns_none() {
        let backend = backend();
        let result = backend
            .find_one_and_update(
                "plain",
                &Filter::new().eq("name", "missing"),
                JsonMap::new(),
                false,
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates_single_document() {
        let backend = backend();
        let key = || Filter::new().eq("a", "1").eq("b", "2");

        let mut set = JsonMap::new();
        set.insert("payload".to_string(), json!("first"));
        backend
            .find_one_and_update("things", &key(), set, true)
            .await
            .unwrap()
            .unwrap();

        let mut set = JsonMap::new();
        set.insert("payload".to_string(), json!("second"));
        let second = backend
            .find_one_and_update("things", &key(), set, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.get("payload"), Some(&json!("second")));
        // Key fields copied from the filter on insert.
        assert_eq!(second.get("a"), Some(&json!("1")));

        let all = backend.find("things", &key(), None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_by_id_uses_filter_id() {
        let backend = backend();
        let id = "0123456789abcdef01234567";
        let mut set = JsonMap::new();
        set.insert("payload".to_string(), json!("x"));
        let stored = backend
            .find_one_and_update("plain", &Filter::new().eq("_id", id), set, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.get("_id"), Some(&json!(id)));
    }

    #[tokio::test]
    async fn test_unique_index_enforced_on_insert() {
        let backend = backend();
        backend
            .insert("things", json!({"a": "1", "b": "2"}))
            .await
            .unwrap();
        let err = backend
            .insert("things", json!({"a": "1", "b": "2"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_ensure_index_idempotent() {
        let backend = backend();
        let index = &SPECS[0].indexes[0];
        backend.ensure_index("things", index).await.unwrap();
        backend.ensure_index("things", index).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_same_key_upserts_serialize() {
        use std::sync::Arc;

        let backend = Arc::new(backend());
        let mut handles = Vec::new();
        for i in 0..8 {
            let backend = backend.clone();
            handles.push(tokio::spawn(async move {
                let mut set = JsonMap::new();
                set.insert("payload".to_string(), json!(format!("writer-{}", i)));
                set.insert("counter".to_string(), json!(i));
                backend
                    .find_one_and_update(
                        "things",
                        &Filter::new().eq("a", "x").eq("b", "y"),
                        set,
                        true,
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let all = backend
            .find("things", &Filter::new().eq("a", "x").eq("b", "y"), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        // Final state is one writer's payload in full, never a mix.
        let payload = all[0].get("payload").and_then(Value::as_str).unwrap();
        let counter = all[0].get("counter").and_then(Value::as_i64).unwrap();
        assert_eq!(payload, format!("writer-{}", counter));
    }
}

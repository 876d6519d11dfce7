//! Typed collection accessors
//!
//! One [`Collection`] handle per entity, created once at process start
//! from its static [`CollectionSpec`]. A handle is a thin typed wrapper
//! over the shared backend: stateless beyond the backend reference and
//! safe to clone and use concurrently. `ensure_indexes` is idempotent
//! and runs before the handle serves traffic.

use std::marker::PhantomData;
use std::sync::Arc;

use praxis_core::{ObjectId, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{CollectionSpec, DocumentBackend, JsonMap, StoreResult};
use crate::query::{Filter, Sort};
use crate::upsert::UpsertKey;

pub struct Collection<T> {
    backend: Arc<dyn DocumentBackend>,
    spec: &'static CollectionSpec,
    _marker: PhantomData<fn() -> T>,
}

// Manual Clone: the record type itself need not be Clone.
impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            spec: self.spec,
            _marker: PhantomData,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::Serialization {
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(record: &T) -> StoreResult<Value> {
    serde_json::to_value(record).map_err(|e| StoreError::Serialization {
        reason: e.to_string(),
    })
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    pub fn new(backend: Arc<dyn DocumentBackend>, spec: &'static CollectionSpec) -> Self {
        Self {
            backend,
            spec,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Idempotently ensure every index this collection depends on.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        for index in self.spec.indexes {
            self.backend.ensure_index(self.spec.name, index).await?;
        }
        Ok(())
    }

    pub async fn insert(&self, record: &T) -> StoreResult<T> {
        let stored = self.backend.insert(self.spec.name, encode(record)?).await?;
        decode(stored)
    }

    pub async fn find(&self, filter: Filter, sort: Option<Sort>) -> StoreResult<Vec<T>> {
        let documents = self
            .backend
            .find(self.spec.name, &filter, sort.as_ref())
            .await?;
        documents.into_iter().map(decode).collect()
    }

    pub async fn find_one(&self, filter: Filter, sort: Option<Sort>) -> StoreResult<Option<T>> {
        let document = self
            .backend
            .find_one(self.spec.name, &filter, sort.as_ref())
            .await?;
        document.map(decode).transpose()
    }

    /// Exact lookup by canonical identifier.
    pub async fn get(&self, id: &ObjectId) -> StoreResult<Option<T>> {
        self.find_one(Filter::new().eq("_id", id.to_string()), None)
            .await
    }

    /// Overwrite the supplied top-level fields of one matching document.
    /// Returns `None` when nothing matched.
    pub async fn update_one(&self, filter: Filter, set: JsonMap) -> StoreResult<Option<T>> {
        let document = self
            .backend
            .find_one_and_update(self.spec.name, &filter, set, false)
            .await?;
        document.map(decode).transpose()
    }

    /// Atomic locate-or-create-then-replace against a resolved key.
    /// Returns the canonical stored document after the write.
    pub async fn upsert(&self, key: &UpsertKey, set: JsonMap) -> StoreResult<T> {
        let document = self
            .backend
            .find_one_and_update(self.spec.name, &key.filter(), set, true)
            .await?
            .ok_or_else(|| StoreError::UpdateFailed {
                collection: self.spec.name.to_string(),
                reason: "upsert produced no document".to_string(),
            })?;
        decode(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::IndexSpec;
    use crate::memory::MemoryBackend;
    use crate::upsert::resolve_key;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        #[serde(rename = "_id")]
        id: ObjectId,
        label: String,
        size: i32,
    }

    static SPECS: &[CollectionSpec] = &[CollectionSpec {
        name: "widgets",
        indexes: &[IndexSpec {
            name: "widgets_label_unique",
            fields: &["label"],
            unique: true,
        }],
    }];

    fn widgets() -> Collection<Widget> {
        let backend: Arc<dyn DocumentBackend> = Arc::new(MemoryBackend::new(SPECS));
        Collection::new(backend, &SPECS[0])
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let collection = widgets();
        collection.ensure_indexes().await.unwrap();

        let widget = Widget {
            id: ObjectId::generate(),
            label: "bolt".to_string(),
            size: 5,
        };
        let stored = collection.insert(&widget).await.unwrap();
        assert_eq!(stored, widget);

        let fetched = collection.get(&widget.id).await.unwrap().unwrap();
        assert_eq!(fetched, widget);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let collection = widgets();
        let absent = collection.get(&ObjectId::generate()).await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn test_update_one_patches_fields() {
        let collection = widgets();
        let widget = Widget {
            id: ObjectId::generate(),
            label: "nut".to_string(),
            size: 1,
        };
        collection.insert(&widget).await.unwrap();

        let mut set = JsonMap::new();
        set.insert("size".to_string(), serde_json::json!(9));
        let updated = collection
            .update_one(Filter::new().eq("_id", widget.id.to_string()), set)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.size, 9);
        assert_eq!(updated.label, "nut");
    }

    #[tokio::test]
    async fn test_upsert_by_explicit_id_creates_with_that_id() {
        let collection = widgets();
        let id = ObjectId::generate();
        let key = resolve_key(Some(id.as_str()), None).unwrap();

        let mut set = JsonMap::new();
        set.insert("label".to_string(), serde_json::json!("washer"));
        set.insert("size".to_string(), serde_json::json!(2));
        let stored = collection.upsert(&key, set).await.unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.label, "washer");
    }
}

//! In-memory backend implementing both store traits.
//!
//! Documents keep insertion order per collection — arrival order is the
//! fallback ordering the synchronizer depends on. Asset paths map to a
//! `memory://` URL scheme and overwrite on collision, matching the hosted
//! store's native behavior.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::types::compare_values;

use super::traits::{
    BackendError, DocRecord, DocumentStore, ObjectStore, OrderSpec, SortDirection,
};

#[derive(Default)]
struct MemoryInner {
    collections: HashMap<String, Vec<DocRecord>>,
    objects: HashMap<String, Vec<u8>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .collections
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Raw bytes stored at `path`, if any.
    pub fn object_bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().objects.get(path).cloned()
    }

    fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, data: Value) -> Result<String, BackendError> {
        let id = Self::generate_id();
        let mut inner = self.inner.lock();
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(DocRecord {
                id: id.clone(),
                data,
            });
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), BackendError> {
        let mut inner = self.inner.lock();
        let docs = inner.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.data = data,
            None => docs.push(DocRecord {
                id: id.to_string(),
                data,
            }),
        }
        Ok(())
    }

    async fn fetch_all(
        &self,
        collection: &str,
        order: Option<&OrderSpec>,
    ) -> Result<Vec<DocRecord>, BackendError> {
        let mut docs = self
            .inner
            .lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default();

        if let Some(spec) = order {
            docs.sort_by(|a, b| {
                let va = a.data.get(&spec.field).unwrap_or(&Value::Null);
                let vb = b.data.get(&spec.field).unwrap_or(&Value::Null);
                let cmp = compare_values(va, vb);
                match spec.direction {
                    SortDirection::Ascending => cmp,
                    SortDirection::Descending => cmp.reverse(),
                }
            });
        }
        Ok(docs)
    }

    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocRecord>, BackendError> {
        Ok(self
            .inner
            .lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), BackendError> {
        let fields = match fields {
            Value::Object(map) => map,
            _ => return Err(BackendError::new("update fields must be an object")),
        };

        let mut inner = self.inner.lock();
        let doc = inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| BackendError::new(format!("no document {collection}/{id}")))?;

        match &mut doc.data {
            Value::Object(map) => {
                for (k, v) in fields {
                    map.insert(k, v);
                }
                Ok(())
            }
            _ => Err(BackendError::new(format!(
                "document {collection}/{id} is not an object"
            ))),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let mut inner = self.inner.lock();
        if let Some(docs) = inner.collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BackendError> {
        self.inner
            .lock()
            .objects
            .insert(path.to_string(), bytes.to_vec());
        Ok(format!("memory://{path}"))
    }
}

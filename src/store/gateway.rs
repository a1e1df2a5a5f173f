//! RemoteGateway — orchestration layer over the document and object stores.
//!
//! Every write stamps `updatedAt`; only the first write of a document stamps
//! `createdAt`. Backend failures are converted into the crate's error
//! taxonomy at this boundary.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{ReadError, Result, UploadError, WriteError};
use crate::types::{into_object, now_rfc3339};

use super::traits::{DocumentStore, ObjectStore, OrderSpec, StoredAsset};

pub struct RemoteGateway {
    docs: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
}

impl RemoteGateway {
    pub fn new(docs: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { docs, objects }
    }

    /// Raw document-store handle, for callers that need the simplest
    /// possible direct read as a last-resort fallback.
    pub fn docs(&self) -> &Arc<dyn DocumentStore> {
        &self.docs
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Insert `payload` with fresh timestamps, then write the store-assigned
    /// id back into the document so it stays self-describing when spread
    /// into plain objects elsewhere.
    pub async fn create_record(&self, collection: &str, payload: Value) -> Result<String> {
        let mut data = into_object(payload, "payload")?;
        let now = now_rfc3339();
        data.entry("createdAt".to_string())
            .or_insert_with(|| Value::String(now.clone()));
        data.insert("updatedAt".to_string(), Value::String(now));

        let id = self
            .docs
            .create(collection, Value::Object(data))
            .await
            .map_err(|e| WriteError::new("create", collection, None, e.message))?;

        self.docs
            .update(collection, &id, json!({ "id": id }))
            .await
            .map_err(|e| WriteError::new("create", collection, Some(id.clone()), e.message))?;

        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    /// Read every document, merging each store id into its data under `"id"`.
    ///
    /// When `order` is given, the server-side ordered read is attempted
    /// first; on failure (typically a missing index) the read degrades to
    /// unordered with a warning. An empty collection returns an empty vec.
    pub async fn read_all(&self, collection: &str, order: Option<&OrderSpec>) -> Result<Vec<Value>> {
        let records = match order {
            Some(spec) => match self.docs.fetch_all(collection, Some(spec)).await {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(
                        collection,
                        field = %spec.field,
                        error = %err,
                        "ordered read failed, falling back to unordered"
                    );
                    self.docs
                        .fetch_all(collection, None)
                        .await
                        .map_err(|e| ReadError::Backend {
                            collection: collection.to_string(),
                            message: e.message,
                        })?
                }
            },
            None => self
                .docs
                .fetch_all(collection, None)
                .await
                .map_err(|e| ReadError::Backend {
                    collection: collection.to_string(),
                    message: e.message,
                })?,
        };

        Ok(records.into_iter().map(merge_id).collect())
    }

    pub async fn read_one(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let record = self
            .docs
            .fetch_one(collection, id)
            .await
            .map_err(|e| ReadError::Backend {
                collection: collection.to_string(),
                message: e.message,
            })?;
        Ok(record.map(merge_id))
    }

    // -----------------------------------------------------------------------
    // Update / Set / Delete
    // -----------------------------------------------------------------------

    /// Merge `partial` into an existing document, refreshing `updatedAt`.
    ///
    /// A string-encoded `displayOrder` is coerced to a number here so that
    /// form input never poisons the order key.
    pub async fn update_record(&self, collection: &str, id: &str, partial: Value) -> Result<()> {
        let mut fields = into_object(partial, "partial payload")?;

        if let Some(Value::String(s)) = fields.get("displayOrder") {
            if let Ok(n) = s.trim().parse::<f64>() {
                if let Some(num) = serde_json::Number::from_f64(n) {
                    fields.insert("displayOrder".to_string(), Value::Number(num));
                }
            }
        }
        fields.insert("updatedAt".to_string(), Value::String(now_rfc3339()));

        self.docs
            .update(collection, id, Value::Object(fields))
            .await
            .map_err(|e| {
                WriteError::new("update", collection, Some(id.to_string()), e.message).into()
            })
    }

    /// Fixed-key upsert (the profile singleton). Stamps `updatedAt` always
    /// and `createdAt` when the payload does not already carry one.
    pub async fn set_record(&self, collection: &str, id: &str, payload: Value) -> Result<()> {
        let mut data = into_object(payload, "payload")?;
        let now = now_rfc3339();
        data.entry("createdAt".to_string())
            .or_insert_with(|| Value::String(now.clone()));
        data.insert("updatedAt".to_string(), Value::String(now));

        self.docs
            .set(collection, id, Value::Object(data))
            .await
            .map_err(|e| {
                WriteError::new("set", collection, Some(id.to_string()), e.message).into()
            })
    }

    pub async fn delete_record(&self, collection: &str, id: &str) -> Result<()> {
        self.docs.delete(collection, id).await.map_err(|e| {
            WriteError::new("delete", collection, Some(id.to_string()), e.message).into()
        })
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    /// Store `bytes` under `{folder}/{file_name}` and return the durable
    /// asset info. Collisions overwrite, per the store's native behavior.
    pub async fn upload_asset(
        &self,
        folder: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredAsset> {
        let path = format!("{folder}/{file_name}");
        let url = self.objects.put(&path, bytes).await.map_err(|e| UploadError {
            path: path.clone(),
            message: e.message,
        })?;
        Ok(StoredAsset {
            name: file_name.to_string(),
            path,
            url,
        })
    }
}

/// `{ id: doc.id, ...data }` — the id wins over any stale id field already
/// present in the data.
fn merge_id(record: super::traits::DocRecord) -> Value {
    let mut value = record.data;
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), Value::String(record.id));
        value
    } else {
        // Non-object document: wrap so the id is still addressable.
        json!({ "id": record.id, "value": value })
    }
}

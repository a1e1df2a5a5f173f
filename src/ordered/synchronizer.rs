//! Collection Synchronizer — produces a correctly-ordered, field-complete
//! view of an ordered collection from a backend that may return records in
//! arbitrary order with inconsistent order keys.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{ReadError, Result};
use crate::notify::MessageHub;
use crate::store::gateway::RemoteGateway;
use crate::store::traits::OrderSpec;
use crate::types::record_id;

use super::sort::{created_desc_cmp, display_order_cmp, needs_repair, order_key};

/// Fallback order key assigned when the current maximum cannot be determined.
pub const ORDER_FALLBACK: i64 = 999;

// ============================================================================
// CollectionState
// ============================================================================

/// The in-memory ordered sequence backing a rendered list — the single
/// source of truth for what the user currently sees. Mutated only by the
/// synchronizer (on load) and the reorder controller (on move).
#[derive(Default)]
pub struct CollectionState {
    records: Mutex<Vec<Value>>,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.records.lock().clone()
    }

    pub fn replace(&self, records: Vec<Value>) {
        *self.records.lock() = records;
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

// ============================================================================
// Synchronizer
// ============================================================================

#[derive(Clone)]
pub struct Synchronizer {
    gateway: Arc<RemoteGateway>,
    hub: Arc<MessageHub>,
}

impl Synchronizer {
    pub fn new(gateway: Arc<RemoteGateway>, hub: Arc<MessageHub>) -> Self {
        Self { gateway, hub }
    }

    pub fn gateway(&self) -> &Arc<RemoteGateway> {
        &self.gateway
    }

    /// Fetch, sort, and self-heal an ordered collection, then publish it to
    /// `state`.
    ///
    /// The primary read is unordered — it must not depend on a possibly
    /// missing server index. If it fails, one direct unordered read against
    /// the raw store is attempted before surfacing the error; if both fail
    /// the state is left empty (never stale) and a `ReadError` is returned.
    pub async fn load_ordered(&self, collection: &str, state: &CollectionState) -> Result<Vec<Value>> {
        let mut records = match self.gateway.read_all(collection, None).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    collection,
                    error = %err,
                    "primary read failed, retrying with a direct unordered read"
                );
                match self.gateway.docs().fetch_all(collection, None).await {
                    Ok(raw) => raw
                        .into_iter()
                        .map(|doc| {
                            let mut data = doc.data;
                            if let Some(map) = data.as_object_mut() {
                                map.insert("id".to_string(), Value::String(doc.id));
                            }
                            data
                        })
                        .collect(),
                    Err(fallback_err) => {
                        state.replace(Vec::new());
                        self.hub
                            .error(format!("Error loading {collection}: {fallback_err}"));
                        return Err(ReadError::Backend {
                            collection: collection.to_string(),
                            message: fallback_err.message,
                        }
                        .into());
                    }
                }
            }
        };

        records.sort_by(display_order_cmp);

        if needs_repair(&records) {
            tracing::warn!(collection, "inconsistent display order detected, repairing");
            self.repair_order(collection, &mut records).await;
        }

        state.replace(records.clone());
        Ok(records)
    }

    /// Full renumbering: re-sort by `createdAt` descending for a
    /// deterministic base order, then assign `displayOrder = index + 1`,
    /// persisting only the records whose value actually changed.
    ///
    /// Writes are sequential; the loop stops at the first failure and the
    /// remainder is left for the next load to repair. Not a minimal patch —
    /// acceptable because repair is rare and collections are small.
    async fn repair_order(&self, collection: &str, records: &mut [Value]) {
        records.sort_by(created_desc_cmp);

        let mut rewritten = 0usize;
        for (index, record) in records.iter_mut().enumerate() {
            let target = (index + 1) as i64;
            if order_key(record) == Some(target as f64) {
                continue;
            }
            let Some(id) = record_id(record).map(str::to_string) else {
                tracing::warn!(collection, index, "record without id skipped during repair");
                continue;
            };
            if let Err(err) = self
                .gateway
                .update_record(collection, &id, json!({ "displayOrder": target }))
                .await
            {
                tracing::warn!(collection, id = %id, error = %err, "order repair write failed");
                return;
            }
            record["displayOrder"] = json!(target);
            rewritten += 1;
        }

        if rewritten > 0 {
            tracing::debug!(collection, rewritten, "display order repaired");
            self.hub
                .success(format!("{collection} display orders updated successfully"));
        }
    }

    /// Create a record in an ordered collection, auto-assigning
    /// `displayOrder = max + 1` when the payload does not carry one (`1` for
    /// the first record, `ORDER_FALLBACK` when the maximum cannot be read).
    pub async fn create_ordered(&self, collection: &str, mut payload: Value) -> Result<String> {
        if order_key(&payload).is_none() {
            // Direct ordered fetch, no unordered fallback: an arbitrary first
            // record would yield a bogus maximum and duplicate keys.
            let next = match self
                .gateway
                .docs()
                .fetch_all(collection, Some(&OrderSpec::desc("displayOrder")))
                .await
            {
                Ok(records) => records
                    .first()
                    .and_then(|doc| order_key(&doc.data))
                    .map(|highest| highest as i64 + 1)
                    .unwrap_or(1),
                Err(err) => {
                    tracing::warn!(
                        collection,
                        error = %err,
                        "could not determine next display order, using fallback"
                    );
                    ORDER_FALLBACK
                }
            };
            if let Some(map) = payload.as_object_mut() {
                map.insert("displayOrder".to_string(), json!(next));
            }
        }
        self.gateway.create_record(collection, payload).await
    }
}

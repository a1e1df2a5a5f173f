//! Reorder Controller — turns a drag gesture's (source, destination) pair
//! into a persisted new order, with an optimistic local update and a resync
//! rollback on failure.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{Result, ValidationErrors};
use crate::notify::MessageHub;
use crate::store::gateway::RemoteGateway;
use crate::types::record_id;

use super::synchronizer::{CollectionState, Synchronizer};

// ============================================================================
// Pure Move
// ============================================================================

/// Standard list move: remove the element at `source` and reinsert it at
/// `destination`, then renumber every element `displayOrder = index + 1`.
/// Indices must already be validated.
pub fn plan_move(records: &[Value], source: usize, destination: usize) -> Vec<Value> {
    let mut next: Vec<Value> = records.to_vec();
    let moved = next.remove(source);
    next.insert(destination, moved);
    for (index, record) in next.iter_mut().enumerate() {
        if let Some(map) = record.as_object_mut() {
            map.insert("displayOrder".to_string(), json!(index as i64 + 1));
        }
    }
    next
}

// ============================================================================
// ReorderController
// ============================================================================

pub struct ReorderController {
    gateway: Arc<RemoteGateway>,
    sync: Synchronizer,
    hub: Arc<MessageHub>,
}

impl ReorderController {
    pub fn new(gateway: Arc<RemoteGateway>, sync: Synchronizer, hub: Arc<MessageHub>) -> Self {
        Self { gateway, sync, hub }
    }

    /// Move the record at `source` to `destination` and persist the
    /// resulting order.
    ///
    /// The local state is replaced with the new order *before* any network
    /// call. Every record's order key is then rewritten sequentially —
    /// O(N) writes per single-element move, which guarantees a dense 1..N
    /// sequence but does not scale to large collections. On the first failed
    /// write, remaining writes are abandoned and the state is resynchronized
    /// from the backend rather than left in the optimistic guess.
    pub async fn move_record(
        &self,
        collection: &str,
        state: &CollectionState,
        source: usize,
        destination: usize,
    ) -> Result<Vec<Value>> {
        let current = state.snapshot();

        if current.is_empty() {
            self.hub.error("Cannot reorder - no records to reorder");
            return Err(ValidationErrors::single("collection", "empty collection").into());
        }
        if source >= current.len() || destination >= current.len() {
            tracing::warn!(
                collection,
                source,
                destination,
                len = current.len(),
                "reorder indices out of range"
            );
            self.hub.error("Invalid reordering operation");
            return Err(ValidationErrors::single(
                "index",
                format!(
                    "source {source} / destination {destination} out of range for {} records",
                    current.len()
                ),
            )
            .into());
        }
        if source == destination {
            // No-op: nothing changes, no writes are issued.
            return Ok(current);
        }

        let next = plan_move(&current, source, destination);

        // Optimistic update for a responsive list, before any confirmation.
        state.replace(next.clone());

        for (index, record) in next.iter().enumerate() {
            let Some(id) = record_id(record) else {
                tracing::warn!(collection, index, "record without id skipped during reorder");
                continue;
            };
            if let Err(err) = self
                .gateway
                .update_record(collection, id, json!({ "displayOrder": index as i64 + 1 }))
                .await
            {
                self.hub
                    .error(format!("Error updating {collection} order: {err}"));
                // Resync with whatever the backend actually holds — no
                // partial-state guess.
                let _ = self.sync.load_ordered(collection, state).await;
                return Err(err);
            }
        }

        self.hub.success("Order updated successfully!");
        Ok(next)
    }
}

// ============================================================================
// Tests
// ============================================================================

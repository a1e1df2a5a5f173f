//! Shared fixtures: a document store with injectable failures and a write
//! log, plus a small rig builder wiring it into a gateway and synchronizer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use folio_console::notify::MessageHub;
use folio_console::ordered::Synchronizer;
use folio_console::store::gateway::RemoteGateway;
use folio_console::store::memory::MemoryStore;
use folio_console::store::traits::{BackendError, DocRecord, DocumentStore, OrderSpec};

type UpdateHook = Box<dyn Fn(usize) -> Option<BackendError> + Send + Sync>;

/// MemoryStore wrapper whose `update` and `fetch_all` calls can be made to
/// fail on demand. Successful updates are logged as `(id, fields)` so tests
/// can assert exactly which order writes reached the backend.
pub struct HookedStore {
    inner: MemoryStore,
    update_calls: AtomicUsize,
    update_hook: Mutex<Option<UpdateHook>>,
    fail_fetches: Mutex<bool>,
    reject_ordered: Mutex<bool>,
    pub update_log: Mutex<Vec<(String, Value)>>,
}

impl HookedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            update_calls: AtomicUsize::new(0),
            update_hook: Mutex::new(None),
            fail_fetches: Mutex::new(false),
            reject_ordered: Mutex::new(false),
            update_log: Mutex::new(Vec::new()),
        }
    }

    /// Fail every `update` starting with the `from`-th call (1-based).
    pub fn fail_updates_from(&self, from: usize) {
        *self.update_hook.lock() = Some(Box::new(move |call| {
            (call >= from).then(|| BackendError::new("write rejected"))
        }));
    }

    pub fn fail_all_fetches(&self) {
        *self.fail_fetches.lock() = true;
    }

    /// Reject only fetches that ask for a server-side ordering, the way a
    /// backend without the matching index does. Unordered reads still work.
    pub fn reject_ordered_fetches(&self) {
        *self.reject_ordered.lock() = true;
    }

    pub fn update_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// The `displayOrder` values successfully written, as `(id, order)`.
    pub fn order_writes(&self) -> Vec<(String, i64)> {
        self.update_log
            .lock()
            .iter()
            .filter_map(|(id, fields)| {
                fields
                    .get("displayOrder")
                    .and_then(Value::as_i64)
                    .map(|order| (id.clone(), order))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for HookedStore {
    async fn create(&self, collection: &str, data: Value) -> Result<String, BackendError> {
        self.inner.create(collection, data).await
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), BackendError> {
        self.inner.set(collection, id, data).await
    }

    async fn fetch_all(
        &self,
        collection: &str,
        order: Option<&OrderSpec>,
    ) -> Result<Vec<DocRecord>, BackendError> {
        if *self.fail_fetches.lock() {
            return Err(BackendError::new("backend unavailable"));
        }
        if order.is_some() && *self.reject_ordered.lock() {
            return Err(BackendError::new("the query requires an index"));
        }
        self.inner.fetch_all(collection, order).await
    }

    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocRecord>, BackendError> {
        self.inner.fetch_one(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), BackendError> {
        let call = self.update_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(hook) = self.update_hook.lock().as_ref() {
            if let Some(err) = hook(call) {
                return Err(err);
            }
        }
        self.update_log.lock().push((id.to_string(), fields.clone()));
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        self.inner.delete(collection, id).await
    }
}

// ============================================================================
// Rig
// ============================================================================

pub struct Rig {
    pub store: Arc<HookedStore>,
    pub gateway: Arc<RemoteGateway>,
    pub hub: Arc<MessageHub>,
    pub sync: Synchronizer,
}

pub fn rig() -> Rig {
    let store = Arc::new(HookedStore::new());
    let objects = Arc::new(MemoryStore::new());
    let gateway = Arc::new(RemoteGateway::new(store.clone(), objects));
    let hub = Arc::new(MessageHub::new());
    let sync = Synchronizer::new(gateway.clone(), hub.clone());
    Rig {
        store,
        gateway,
        hub,
        sync,
    }
}

impl Rig {
    /// Seed a document at a fixed id, bypassing the gateway so no timestamp
    /// stamping or id write-back happens. Tests control every field.
    pub async fn seed(&self, collection: &str, id: &str, doc: Value) {
        self.store.set(collection, id, doc).await.unwrap();
    }

    /// A project document with explicit order and creation-time fields.
    pub fn project(id: &str, order: Option<i64>, created: &str) -> Value {
        let mut doc = json!({
            "id": id,
            "title": format!("Project {id}"),
            "category": "Web",
            "createdAt": created,
        });
        if let Some(order) = order {
            doc["displayOrder"] = json!(order);
        }
        doc
    }
}

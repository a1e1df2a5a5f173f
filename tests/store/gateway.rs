//! RemoteGateway behavior: id write-back, timestamp stamping, ordered-read
//! fallback, displayOrder coercion, and asset uploads.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use folio_console::error::ConsoleError;
use folio_console::store::gateway::RemoteGateway;
use folio_console::store::memory::MemoryStore;
use folio_console::store::traits::{
    BackendError, DocRecord, DocumentStore, OrderSpec,
};

fn gateway_over(store: Arc<MemoryStore>) -> RemoteGateway {
    RemoteGateway::new(store.clone(), store)
}

// ============================================================================
// Mock: ordered reads rejected (missing index)
// ============================================================================

struct NoIndexStore {
    inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for NoIndexStore {
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
        if order.is_some() {
            return Err(BackendError::new("the query requires an index"));
        }
        self.inner.fetch_all(collection, None).await
    }

    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocRecord>, BackendError> {
        self.inner.fetch_one(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), BackendError> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        self.inner.delete(collection, id).await
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_record_writes_id_back_into_document() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    let id = gateway
        .create_record("projects", json!({"title": "Site", "category": "Web"}))
        .await
        .unwrap();

    let doc = store.fetch_one("projects", &id).await.unwrap().unwrap();
    assert_eq!(doc.data["id"], json!(id));
}

#[tokio::test]
async fn create_record_stamps_timestamps_preserving_existing_created_at() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    let id = gateway
        .create_record(
            "projects",
            json!({"title": "Old", "createdAt": "2020-01-01T00:00:00+00:00"}),
        )
        .await
        .unwrap();

    let doc = store.fetch_one("projects", &id).await.unwrap().unwrap();
    assert_eq!(doc.data["createdAt"], json!("2020-01-01T00:00:00+00:00"));
    assert!(doc.data["updatedAt"].is_string());
    assert_ne!(doc.data["updatedAt"], doc.data["createdAt"]);
}

#[tokio::test]
async fn create_record_rejects_non_object_payloads() {
    let gateway = gateway_over(Arc::new(MemoryStore::new()));
    let err = gateway
        .create_record("projects", json!(["not", "an", "object"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn read_all_merges_ids_and_handles_empty_collections() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    assert!(gateway.read_all("projects", None).await.unwrap().is_empty());

    let id = gateway
        .create_record("projects", json!({"title": "Site"}))
        .await
        .unwrap();
    let records = gateway.read_all("projects", None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], json!(id));
    assert_eq!(records[0]["title"], json!("Site"));
}

#[tokio::test]
async fn read_all_falls_back_to_unordered_when_index_is_missing() {
    let store = Arc::new(NoIndexStore {
        inner: MemoryStore::new(),
    });
    let objects = Arc::new(MemoryStore::new());
    let gateway = RemoteGateway::new(store, objects);

    gateway
        .create_record("certificates", json!({"title": "AWS"}))
        .await
        .unwrap();
    gateway
        .create_record("certificates", json!({"title": "GCP"}))
        .await
        .unwrap();

    // The ordered read is rejected, but the caller still gets data.
    let records = gateway
        .read_all("certificates", Some(&OrderSpec::desc("createdAt")))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn read_one_returns_none_for_absent_documents() {
    let gateway = gateway_over(Arc::new(MemoryStore::new()));
    assert!(gateway.read_one("main", "profile").await.unwrap().is_none());
}

// ============================================================================
// Update / Set / Delete
// ============================================================================

#[tokio::test]
async fn update_record_refreshes_updated_at_and_coerces_display_order() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    let id = gateway
        .create_record("projects", json!({"title": "Site"}))
        .await
        .unwrap();
    gateway
        .update_record("projects", &id, json!({"displayOrder": "7"}))
        .await
        .unwrap();

    let doc = store.fetch_one("projects", &id).await.unwrap().unwrap();
    assert_eq!(doc.data["displayOrder"], json!(7.0));
    assert!(doc.data["updatedAt"].is_string());
}

#[tokio::test]
async fn update_record_fails_for_unknown_id() {
    let gateway = gateway_over(Arc::new(MemoryStore::new()));
    let err = gateway
        .update_record("projects", "ghost", json!({"title": "x"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::Write(_)), "got: {err}");
}

#[tokio::test]
async fn set_record_upserts_profile_at_fixed_key() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    gateway
        .set_record("main", "profile", json!({"name": "Dana"}))
        .await
        .unwrap();
    gateway
        .set_record("main", "profile", json!({"name": "Dana", "bio": "hi"}))
        .await
        .unwrap();

    assert_eq!(store.len("main"), 1);
    let profile = gateway.read_one("main", "profile").await.unwrap().unwrap();
    assert_eq!(profile["bio"], json!("hi"));
    assert!(profile["createdAt"].is_string());
    assert!(profile["updatedAt"].is_string());
}

#[tokio::test]
async fn delete_record_removes_document() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    let id = gateway
        .create_record("projects", json!({"title": "x"}))
        .await
        .unwrap();
    gateway.delete_record("projects", &id).await.unwrap();
    assert!(gateway.read_one("projects", &id).await.unwrap().is_none());
}

// ============================================================================
// Assets
// ============================================================================

#[tokio::test]
async fn upload_asset_stores_under_folder_and_returns_url() {
    let store = Arc::new(MemoryStore::new());
    let gateway = gateway_over(store.clone());

    let asset = gateway
        .upload_asset("portfolio/thumbnails", "shot.png", &[1, 2])
        .await
        .unwrap();
    assert_eq!(asset.name, "shot.png");
    assert_eq!(asset.path, "portfolio/thumbnails/shot.png");
    assert_eq!(asset.url, "memory://portfolio/thumbnails/shot.png");
    assert_eq!(
        store.object_bytes("portfolio/thumbnails/shot.png"),
        Some(vec![1, 2])
    );
}

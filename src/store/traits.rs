//! Backend seams: the document store and object store traits.
//!
//! These are the external collaborators. Implementations own all transport
//! detail (network, retries, auth); errors cross the boundary as plain
//! message-carrying `BackendError`s and are classified by the gateway.

use async_trait::async_trait;
use serde_json::Value;

// ============================================================================
// BackendError
// ============================================================================

/// Backend-level error (wraps arbitrary error strings from the store layer).
#[derive(Debug, Clone)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

// ============================================================================
// Ordering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Server-side ordering request for `fetch_all`.
#[derive(Debug, Clone)]
pub struct OrderSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

// ============================================================================
// Records & Assets
// ============================================================================

/// One document as the store returns it: the store-assigned id alongside the
/// raw data. The gateway merges the id into the data before anything else
/// sees it.
#[derive(Debug, Clone)]
pub struct DocRecord {
    pub id: String,
    pub data: Value,
}

/// A durable stored asset, as returned by `upload_asset`.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub name: String,
    pub path: String,
    pub url: String,
}

// ============================================================================
// DocumentStore
// ============================================================================

/// Collection-scoped document CRUD.
///
/// `fetch_all` with an `OrderSpec` may fail where an unordered read would
/// succeed (e.g. a missing server index) — callers are expected to fall back.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document, returning the store-assigned id.
    async fn create(&self, collection: &str, data: Value) -> Result<String, BackendError>;

    /// Upsert a document at a fixed key (used for the profile singleton).
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), BackendError>;

    /// Read every document in a collection. An empty collection is an empty
    /// vec, never an error.
    async fn fetch_all(
        &self,
        collection: &str,
        order: Option<&OrderSpec>,
    ) -> Result<Vec<DocRecord>, BackendError>;

    /// Read one document by id, `None` if absent.
    async fn fetch_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocRecord>, BackendError>;

    /// Merge `fields` into an existing document. Errors if `id` does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), BackendError>;

    /// Delete a document by id.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError>;
}

// ============================================================================
// ObjectStore
// ============================================================================

/// Binary asset storage. Same-path writes overwrite; the store owns any
/// size/CORS policy.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`, returning a durable fetch URL.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BackendError>;
}

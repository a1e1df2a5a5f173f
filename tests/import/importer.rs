//! BulkImporter: section-by-section migration, per-record failure tolerance,
//! and normalization on the way in.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use folio_console::import::importer::{BulkImporter, SectionReport};
use folio_console::import::seed::SeedFile;
use folio_console::notify::MessageHub;
use folio_console::store::gateway::RemoteGateway;
use folio_console::store::memory::MemoryStore;
use folio_console::store::traits::{BackendError, DocRecord, DocumentStore, OrderSpec};

const SEED: &str = r#"{
    "main": {
        "name": "Dana",
        "occupation": "[Engineer, Writer]",
        "email": "dana@example.com"
    },
    "resume": {
        "skills": [
            {"name": "React", "level": "90%"},
            {"name": "Juggling", "level": "50%"}
        ],
        "work": [
            {"company": "Acme", "years": "2020-2024"}
        ],
        "education": [
            {"school": "MIT", "graduated": "2019"}
        ],
        "certificates": [
            {"title": "AWS", "image": "./images/aws.png"},
            {"title": "GCP", "image": "https://cdn/gcp.png"}
        ]
    }
}"#;

struct Fixture {
    store: Arc<MemoryStore>,
    importer: BulkImporter,
    messages: Arc<Mutex<Vec<String>>>,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(RemoteGateway::new(store.clone(), store.clone()));
    let hub = Arc::new(MessageHub::new());
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    hub.on(move |message| sink.lock().push(message.text.clone()));
    Fixture {
        store,
        importer: BulkImporter::new(gateway, hub),
        messages,
    }
}

// ============================================================================
// Mock: create rejected on chosen calls
// ============================================================================

struct FlakyCreateStore {
    inner: MemoryStore,
    create_calls: Mutex<usize>,
    fail_on: Vec<usize>,
}

#[async_trait]
impl DocumentStore for FlakyCreateStore {
    async fn create(&self, collection: &str, data: Value) -> Result<String, BackendError> {
        let call = {
            let mut calls = self.create_calls.lock();
            *calls += 1;
            *calls
        };
        if self.fail_on.contains(&call) {
            return Err(BackendError::new("insert rejected"));
        }
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
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        self.inner.delete(collection, id).await
    }
}

// ============================================================================
// Full Migration
// ============================================================================

#[tokio::test]
async fn import_all_migrates_every_section() {
    let fx = fixture();
    let seed = SeedFile::parse(SEED).unwrap();

    let reports = fx.importer.import_all(&seed).await;

    assert_eq!(
        reports,
        [
            SectionReport { section: "skills", succeeded: 2, total: 2 },
            SectionReport { section: "work", succeeded: 1, total: 1 },
            SectionReport { section: "education", succeeded: 1, total: 1 },
            SectionReport { section: "certificates", succeeded: 2, total: 2 },
        ]
    );

    // Profile: fixed key, bracketed occupation parsed into an array.
    let profile = fx.store.fetch_one("main", "profile").await.unwrap().unwrap();
    assert_eq!(profile.data["occupation"], json!(["Engineer", "Writer"]));
    assert!(profile.data["createdAt"].is_string());

    // Skills: category derived from the lookup lists.
    let skills = fx.store.fetch_all("skills", None).await.unwrap();
    let categories: Vec<&str> = skills
        .iter()
        .map(|d| d.data["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, ["Frontend", "Other Skills"]);

    // Certificates: relative marker stripped, absolute URL untouched.
    let certificates = fx.store.fetch_all("certificates", None).await.unwrap();
    assert_eq!(certificates[0].data["image"], json!("images/aws.png"));
    assert_eq!(certificates[1].data["image"], json!("https://cdn/gcp.png"));

    let texts = fx.messages.lock();
    assert!(texts.contains(&"Profile migration complete.".to_string()));
    assert!(texts.contains(&"Skills migration complete. Added 2 of 2 entries.".to_string()));
    assert!(
        texts.contains(&"Certificates migration complete. Added 2 of 2 entries.".to_string())
    );
}

#[tokio::test]
async fn one_bad_record_does_not_abort_its_section() {
    let store = Arc::new(FlakyCreateStore {
        inner: MemoryStore::new(),
        create_calls: Mutex::new(0),
        fail_on: vec![2],
    });
    let gateway = Arc::new(RemoteGateway::new(store.clone(), Arc::new(MemoryStore::new())));
    let hub = Arc::new(MessageHub::new());
    let importer = BulkImporter::new(gateway, hub.clone());

    let seed = SeedFile::parse(
        r#"{"resume": {"skills": [
            {"name": "a"}, {"name": "b"}, {"name": "c"}, {"name": "d"}, {"name": "e"}
        ]}}"#,
    )
    .unwrap();

    let report = importer.import_skills(&seed).await.unwrap();
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.total, 5);
    assert_eq!(store.inner.len("skills"), 4);
    assert_eq!(
        hub.current().unwrap().text,
        "Skills migration complete. Added 4 of 5 entries."
    );
}

#[tokio::test]
async fn missing_profile_is_reported_and_remaining_sections_still_run() {
    let fx = fixture();
    let seed = SeedFile::parse(
        r#"{"resume": {
            "skills": [{"name": "React"}],
            "work": [{"company": "Acme"}],
            "education": [{"school": "MIT"}],
            "certificates": [{"title": "AWS"}]
        }}"#,
    )
    .unwrap();

    let reports = fx.importer.import_all(&seed).await;
    assert_eq!(reports.len(), 4);
    assert!(fx.store.fetch_one("main", "profile").await.unwrap().is_none());

    let texts = fx.messages.lock();
    assert!(
        texts.iter().any(|t| t.starts_with("Error migrating profile:")),
        "got: {texts:?}"
    );
}

#[tokio::test]
async fn missing_sections_are_skipped_with_errors() {
    let fx = fixture();
    let seed = SeedFile::parse(
        r#"{
            "main": {"name": "Dana"},
            "resume": {"skills": [{"name": "React"}]}
        }"#,
    )
    .unwrap();

    let reports = fx.importer.import_all(&seed).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].section, "skills");

    let texts = fx.messages.lock();
    let section_errors = texts
        .iter()
        .filter(|t| t.starts_with("Error migrating data:"))
        .count();
    assert_eq!(section_errors, 3, "got: {texts:?}");
}

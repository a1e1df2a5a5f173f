//! Console facade — wires the gateway, synchronizer, reorder controller and
//! importer to per-collection UI state, and expresses the uniform
//! "fetch → normalize → store → message on error" pattern once over a
//! section table instead of per-entity repetition.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{ConsoleError, Result, ValidationErrors};
use crate::import::{BulkImporter, SectionReport, SeedFile};
use crate::notify::MessageHub;
use crate::ordered::{CollectionState, ReorderController, Synchronizer};
use crate::state::{BusyFlags, OpFamily};
use crate::store::gateway::RemoteGateway;
use crate::store::traits::{DocumentStore, ObjectStore, OrderSpec, SortDirection};
use crate::types::{
    require_fields, required_fields, CERTIFICATES, EDUCATION, PROFILE_COLLECTION, PROFILE_DOC,
    PROJECTS, SKILLS, WORK,
};
use crate::upload::{upload_batch, EntityKind, UploadFile, UploadReport};

// ============================================================================
// Section Table
// ============================================================================

/// The plain list sections and their preferred server-side ordering.
/// Projects are absent — they go through the synchronizer instead.
const SECTIONS: &[(&str, &str, SortDirection)] = &[
    (CERTIFICATES, "createdAt", SortDirection::Descending),
    (SKILLS, "category", SortDirection::Ascending),
    (WORK, "years", SortDirection::Descending),
    (EDUCATION, "graduated", SortDirection::Descending),
];

fn section_order(collection: &str) -> Option<OrderSpec> {
    SECTIONS
        .iter()
        .find(|(name, _, _)| *name == collection)
        .map(|(_, field, direction)| OrderSpec {
            field: (*field).to_string(),
            direction: *direction,
        })
}

// ============================================================================
// Console
// ============================================================================

pub struct Console {
    gateway: Arc<RemoteGateway>,
    hub: Arc<MessageHub>,
    sync: Synchronizer,
    reorder: ReorderController,
    importer: BulkImporter,
    busy: BusyFlags,

    pub projects: CollectionState,
    pub certificates: CollectionState,
    pub skills: CollectionState,
    pub work: CollectionState,
    pub education: CollectionState,
    pub profile: Mutex<Option<Value>>,
}

impl Console {
    pub fn new(docs: Arc<dyn DocumentStore>, objects: Arc<dyn ObjectStore>) -> Self {
        let gateway = Arc::new(RemoteGateway::new(docs, objects));
        let hub = Arc::new(MessageHub::new());
        let sync = Synchronizer::new(Arc::clone(&gateway), Arc::clone(&hub));
        let reorder =
            ReorderController::new(Arc::clone(&gateway), sync.clone(), Arc::clone(&hub));
        let importer = BulkImporter::new(Arc::clone(&gateway), Arc::clone(&hub));

        Self {
            gateway,
            hub,
            sync,
            reorder,
            importer,
            busy: BusyFlags::new(),
            projects: CollectionState::new(),
            certificates: CollectionState::new(),
            skills: CollectionState::new(),
            work: CollectionState::new(),
            education: CollectionState::new(),
            profile: Mutex::new(None),
        }
    }

    pub fn hub(&self) -> &Arc<MessageHub> {
        &self.hub
    }

    pub fn gateway(&self) -> &Arc<RemoteGateway> {
        &self.gateway
    }

    fn state_for(&self, collection: &str) -> Option<&CollectionState> {
        match collection {
            PROJECTS => Some(&self.projects),
            CERTIFICATES => Some(&self.certificates),
            SKILLS => Some(&self.skills),
            WORK => Some(&self.work),
            EDUCATION => Some(&self.education),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load every section sequentially, counting successes over the five
    /// core data types.
    pub async fn load_all(&self) -> usize {
        self.hub.info("Loading data...");

        let mut success = 0usize;
        const TOTAL: usize = 5;

        if self.load_projects().await.is_ok() {
            success += 1;
        }
        if self.load_section(CERTIFICATES).await.is_ok() {
            success += 1;
        }
        if self.load_profile().await.is_ok() {
            success += 1;
        }
        if self.load_section(SKILLS).await.is_ok() {
            success += 1;
        }
        if self.load_section(WORK).await.is_ok() {
            success += 1;
        }
        // Education is loaded too but not counted toward the core total.
        let _ = self.load_section(EDUCATION).await;

        if success == TOTAL {
            self.hub.success("All data loaded successfully");
        } else {
            self.hub.info(format!("Loaded {success}/{TOTAL} data types"));
        }
        success
    }

    /// Load the ordered projects collection through the synchronizer,
    /// repairing inconsistent order keys along the way.
    pub async fn load_projects(&self) -> Result<Vec<Value>> {
        self.sync.load_ordered(PROJECTS, &self.projects).await
    }

    /// Load one plain list section with its preferred ordering. On failure
    /// the prior state is kept and the error is surfaced as a message.
    pub async fn load_section(&self, collection: &str) -> Result<Vec<Value>> {
        let state = self
            .state_for(collection)
            .ok_or_else(|| ConsoleError::Internal(format!("unknown section {collection}")))?;
        let order = section_order(collection);

        match self.gateway.read_all(collection, order.as_ref()).await {
            Ok(records) => {
                state.replace(records.clone());
                Ok(records)
            }
            Err(err) => {
                self.hub.error(format!("Error loading {collection}: {err}"));
                Err(err)
            }
        }
    }

    pub async fn load_profile(&self) -> Result<Option<Value>> {
        match self.gateway.read_one(PROFILE_COLLECTION, PROFILE_DOC).await {
            Ok(Some(profile)) => {
                *self.profile.lock() = Some(profile.clone());
                Ok(Some(profile))
            }
            Ok(None) => {
                tracing::debug!("no profile document found");
                Ok(None)
            }
            Err(err) => {
                self.hub.error(format!("Error loading profile: {err}"));
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    /// Save the profile singleton at its fixed key.
    pub async fn save_profile(&self, draft: Value) -> Result<()> {
        match self
            .gateway
            .set_record(PROFILE_COLLECTION, PROFILE_DOC, draft)
            .await
        {
            Ok(()) => {
                self.load_profile().await?;
                self.hub.success("Profile updated successfully!");
                Ok(())
            }
            Err(err) => {
                self.hub.error(format!("Error updating profile: {err}"));
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Generic CRUD
    // -----------------------------------------------------------------------

    /// Create a record in a list collection after local validation, then
    /// reload the section. Projects get their display order auto-assigned.
    pub async fn create_in(&self, collection: &str, payload: Value) -> Result<String> {
        if let Err(err) = require_fields(&payload, required_fields(collection)) {
            self.hub.error(err.to_string());
            return Err(err);
        }

        let result = if collection == PROJECTS {
            self.sync.create_ordered(collection, payload).await
        } else {
            self.gateway.create_record(collection, payload).await
        };

        match result {
            Ok(id) => {
                self.reload(collection).await;
                self.hub.success(format!("New {collection} entry created!"));
                Ok(id)
            }
            Err(err) => {
                self.hub.error(format!("Error creating {collection} entry: {err}"));
                Err(err)
            }
        }
    }

    /// Update an existing record from a full draft, then reload the section.
    pub async fn update_in(&self, collection: &str, id: &str, draft: Value) -> Result<()> {
        if let Err(err) = require_fields(&draft, required_fields(collection)) {
            self.hub.error(err.to_string());
            return Err(err);
        }

        match self.gateway.update_record(collection, id, draft).await {
            Ok(()) => {
                self.reload(collection).await;
                self.hub.success(format!("{collection} entry updated!"));
                Ok(())
            }
            Err(err) => {
                self.hub.error(format!("Error updating {collection} entry: {err}"));
                Err(err)
            }
        }
    }

    /// Delete a record, then reload the section. Deletion is assumed to be
    /// confirmed by the caller.
    pub async fn delete_in(&self, collection: &str, id: &str) -> Result<()> {
        match self.gateway.delete_record(collection, id).await {
            Ok(()) => {
                self.reload(collection).await;
                self.hub.success(format!("{collection} entry deleted"));
                Ok(())
            }
            Err(err) => {
                self.hub.error(format!("Error deleting {collection} entry: {err}"));
                Err(err)
            }
        }
    }

    async fn reload(&self, collection: &str) {
        let result = if collection == PROJECTS {
            self.load_projects().await.map(|_| ())
        } else {
            self.load_section(collection).await.map(|_| ())
        };
        if let Err(err) = result {
            tracing::warn!(collection, error = %err, "reload after write failed");
        }
    }

    // -----------------------------------------------------------------------
    // Reorder
    // -----------------------------------------------------------------------

    /// Move a project from `source` to `destination`, gated by the reorder
    /// busy flag.
    pub async fn move_project(&self, source: usize, destination: usize) -> Result<Vec<Value>> {
        let Some(_guard) = self.busy.try_begin(OpFamily::Reorder) else {
            return Err(ValidationErrors::single("reorder", "operation already in progress").into());
        };
        self.reorder
            .move_record(PROJECTS, &self.projects, source, destination)
            .await
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    /// Upload a batch of images for one entity draft, gated by the upload
    /// busy flag.
    pub async fn upload_images(
        &self,
        kind: EntityKind,
        is_thumb: bool,
        files: &[UploadFile],
        draft: &mut Value,
    ) -> Result<UploadReport> {
        let Some(_guard) = self.busy.try_begin(OpFamily::Upload) else {
            return Err(ValidationErrors::single("upload", "operation already in progress").into());
        };
        Ok(upload_batch(&self.gateway, &self.hub, kind, is_thumb, files, draft).await)
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    pub async fn import_skills(&self, seed: &SeedFile) -> Result<SectionReport> {
        let report = self.importer.import_skills(seed).await?;
        self.reload(SKILLS).await;
        Ok(report)
    }

    pub async fn import_work(&self, seed: &SeedFile) -> Result<SectionReport> {
        let report = self.importer.import_work(seed).await?;
        self.reload(WORK).await;
        Ok(report)
    }

    pub async fn import_education(&self, seed: &SeedFile) -> Result<SectionReport> {
        let report = self.importer.import_education(seed).await?;
        self.reload(EDUCATION).await;
        Ok(report)
    }

    pub async fn import_certificates(&self, seed: &SeedFile) -> Result<SectionReport> {
        let report = self.importer.import_certificates(seed).await?;
        self.reload(CERTIFICATES).await;
        Ok(report)
    }

    pub async fn import_profile(&self, seed: &SeedFile) -> Result<()> {
        self.importer.import_profile(seed).await?;
        self.load_profile().await.map(|_| ())
    }

    /// Run the whole migration, gated by the import busy flag. Sections run
    /// sequentially and independently; every affected state is reloaded
    /// afterwards regardless of partial failures.
    pub async fn import_all(&self, seed: &SeedFile) -> Result<Vec<SectionReport>> {
        let Some(_guard) = self.busy.try_begin(OpFamily::Import) else {
            return Err(ValidationErrors::single("import", "migration already in progress").into());
        };

        let reports = self.importer.import_all(seed).await;

        let _ = self.load_profile().await;
        for (collection, _, _) in SECTIONS {
            self.reload(collection).await;
        }
        Ok(reports)
    }
}

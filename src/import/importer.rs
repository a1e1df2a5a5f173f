//! Bulk Importer — one-shot migration of seed JSON into the document store.
//!
//! Array sections insert record by record and never abort the whole batch
//! for one bad record; each section reports `succeeded of total`. The
//! profile is a fixed-key upsert, not a collection insert.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::notify::MessageHub;
use crate::store::gateway::RemoteGateway;
use crate::types::{CERTIFICATES, EDUCATION, PROFILE_COLLECTION, PROFILE_DOC, SKILLS, WORK};

use super::seed::{normalize_occupation, skill_category, strip_relative_prefix, SeedFile};

/// Outcome of one array-section import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub section: &'static str,
    pub succeeded: usize,
    pub total: usize,
}

pub struct BulkImporter {
    gateway: Arc<RemoteGateway>,
    hub: Arc<MessageHub>,
}

impl BulkImporter {
    pub fn new(gateway: Arc<RemoteGateway>, hub: Arc<MessageHub>) -> Self {
        Self { gateway, hub }
    }

    // -----------------------------------------------------------------------
    // Sections
    // -----------------------------------------------------------------------

    /// Import skills, deriving each record's `category` from the fixed
    /// name→category lookup.
    pub async fn import_skills(&self, seed: &SeedFile) -> Result<SectionReport> {
        let skills = seed.skills()?;
        self.hub.info("Starting skills migration...");

        let mut succeeded = 0usize;
        for skill in skills {
            let mut data = skill.clone();
            let name = data
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let category = skill_category(&name);
            if let Some(map) = data.as_object_mut() {
                map.insert("category".to_string(), Value::String(category.to_string()));
            }
            match self.gateway.create_record(SKILLS, data).await {
                Ok(_) => succeeded += 1,
                Err(err) => tracing::error!(skill = %name, error = %err, "error adding skill"),
            }
        }

        self.finish("skills", SKILLS, succeeded, skills.len())
    }

    pub async fn import_work(&self, seed: &SeedFile) -> Result<SectionReport> {
        let entries = seed.work()?;
        self.hub.info("Starting work experience migration...");

        let mut succeeded = 0usize;
        for entry in entries {
            match self.gateway.create_record(WORK, entry.clone()).await {
                Ok(_) => succeeded += 1,
                Err(err) => tracing::error!(error = %err, "error adding work entry"),
            }
        }

        self.finish("work experience", WORK, succeeded, entries.len())
    }

    pub async fn import_education(&self, seed: &SeedFile) -> Result<SectionReport> {
        let entries = seed.education()?;
        self.hub.info("Starting education migration...");

        let mut succeeded = 0usize;
        for entry in entries {
            match self.gateway.create_record(EDUCATION, entry.clone()).await {
                Ok(_) => succeeded += 1,
                Err(err) => tracing::error!(error = %err, "error adding education entry"),
            }
        }

        self.finish("education", EDUCATION, succeeded, entries.len())
    }

    /// Import certificates, stripping the `./` marker from relative image
    /// paths before storage.
    pub async fn import_certificates(&self, seed: &SeedFile) -> Result<SectionReport> {
        let certificates = seed.certificates()?;
        self.hub.info("Starting certificates migration...");

        let mut succeeded = 0usize;
        for certificate in certificates {
            let mut data = certificate.clone();
            strip_relative_prefix(&mut data);
            match self.gateway.create_record(CERTIFICATES, data).await {
                Ok(_) => succeeded += 1,
                Err(err) => tracing::error!(error = %err, "error adding certificate"),
            }
        }

        self.finish("certificates", CERTIFICATES, succeeded, certificates.len())
    }

    /// Upsert the profile singleton at its fixed document key, normalizing
    /// the legacy bracketed `occupation` encoding first.
    pub async fn import_profile(&self, seed: &SeedFile) -> Result<()> {
        let mut profile = seed.profile()?.clone();
        self.hub.info("Starting profile migration...");

        normalize_occupation(&mut profile);

        self.gateway
            .set_record(PROFILE_COLLECTION, PROFILE_DOC, profile)
            .await?;
        self.hub.success("Profile migration complete.");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // All Sections
    // -----------------------------------------------------------------------

    /// Run every section sequentially. A failing section posts its error and
    /// the remaining sections still run. Returns the array-section reports
    /// that completed.
    pub async fn import_all(&self, seed: &SeedFile) -> Vec<SectionReport> {
        self.hub.info("Starting full data migration...");

        if let Err(err) = self.import_profile(seed).await {
            self.hub.error(format!("Error migrating profile: {err}"));
        }

        let mut reports = Vec::new();
        for result in [
            self.import_skills(seed).await,
            self.import_work(seed).await,
            self.import_education(seed).await,
            self.import_certificates(seed).await,
        ] {
            match result {
                Ok(report) => reports.push(report),
                Err(err) => self.hub.error(format!("Error migrating data: {err}")),
            }
        }
        reports
    }

    fn finish(
        &self,
        label: &'static str,
        section: &'static str,
        succeeded: usize,
        total: usize,
    ) -> Result<SectionReport> {
        tracing::debug!(section, succeeded, total, "migration complete");
        self.hub.success(format!(
            "{} migration complete. Added {succeeded} of {total} entries.",
            capitalize(label)
        ));
        Ok(SectionReport {
            section,
            succeeded,
            total,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

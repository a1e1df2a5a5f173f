//! Asset upload: a capability table keyed by entity kind replaces repeated
//! string-tag branching. Each kind knows its target folder and how an
//! uploaded URL lands on the draft entity.

use serde_json::Value;

use crate::notify::MessageHub;
use crate::store::gateway::RemoteGateway;
use crate::store::traits::StoredAsset;

// ============================================================================
// Capability Table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Certificate,
    Profile,
    Misc,
}

pub struct UploadTarget {
    /// Target folder, chosen once per batch. `is_thumb` only matters for
    /// projects, which split thumbnails from detail images.
    pub folder: fn(is_thumb: bool) -> &'static str,
    /// Apply an uploaded URL to the draft entity.
    pub apply: fn(draft: &mut Value, url: &str, is_thumb: bool),
}

static PROJECT_TARGET: UploadTarget = UploadTarget {
    folder: |is_thumb| {
        if is_thumb {
            "portfolio/thumbnails"
        } else {
            "portfolio/details"
        }
    },
    apply: |draft, url, is_thumb| {
        let Some(map) = draft.as_object_mut() else {
            return;
        };
        if is_thumb {
            map.insert("thumbnail".to_string(), Value::String(url.to_string()));
        } else {
            let images = map
                .entry("images".to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Some(arr) = images.as_array_mut() {
                arr.push(Value::String(url.to_string()));
            }
        }
    },
};

static CERTIFICATE_TARGET: UploadTarget = UploadTarget {
    folder: |_| "certificates",
    apply: set_image_field,
};

static PROFILE_TARGET: UploadTarget = UploadTarget {
    folder: |_| "profile",
    apply: set_image_field,
};

static MISC_TARGET: UploadTarget = UploadTarget {
    folder: |_| "misc",
    apply: |_, _, _| {},
};

fn set_image_field(draft: &mut Value, url: &str, _is_thumb: bool) {
    if let Some(map) = draft.as_object_mut() {
        map.insert("image".to_string(), Value::String(url.to_string()));
    }
}

pub fn upload_target(kind: EntityKind) -> &'static UploadTarget {
    match kind {
        EntityKind::Project => &PROJECT_TARGET,
        EntityKind::Certificate => &CERTIFICATE_TARGET,
        EntityKind::Profile => &PROFILE_TARGET,
        EntityKind::Misc => &MISC_TARGET,
    }
}

// ============================================================================
// Batch Upload
// ============================================================================

/// One file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub uploaded: Vec<StoredAsset>,
    /// File names that the store rejected; the rest of the batch continued.
    pub failed: Vec<String>,
}

/// Upload a batch of files for one entity, applying each resulting URL to
/// the draft. A rejected file is reported and skipped; remaining files still
/// upload.
pub async fn upload_batch(
    gateway: &RemoteGateway,
    hub: &MessageHub,
    kind: EntityKind,
    is_thumb: bool,
    files: &[UploadFile],
    draft: &mut Value,
) -> UploadReport {
    let target = upload_target(kind);
    let folder = (target.folder)(is_thumb);

    let mut report = UploadReport::default();
    for file in files {
        match gateway.upload_asset(folder, &file.name, &file.bytes).await {
            Ok(asset) => {
                (target.apply)(draft, &asset.url, is_thumb);
                report.uploaded.push(asset);
            }
            Err(err) => {
                tracing::error!(file = %file.name, error = %err, "file upload failed");
                hub.error(format!("Failed to upload {}: {err}", file.name));
                report.failed.push(file.name.clone());
            }
        }
    }

    if !report.uploaded.is_empty() {
        hub.success("Images uploaded successfully!");
    }
    report
}

// ============================================================================
// Tests
// ============================================================================

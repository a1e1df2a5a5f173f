//! Runtime backend configuration.
//!
//! Connection parameters arrive as a JSON blob. A manual override replaces
//! the active configuration but only takes effect after a full restart —
//! active connections never hot-reload.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub storage_bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl BackendConfig {
    fn check_required(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("apiKey"));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::MissingField("projectId"));
        }
        if self.storage_bucket.trim().is_empty() {
            return Err(ConfigError::MissingField("storageBucket"));
        }
        Ok(())
    }
}

/// Parse a pasted JSON override, rejecting blobs missing required fields.
pub fn parse_override(text: &str) -> Result<BackendConfig, ConfigError> {
    let config: BackendConfig =
        serde_json::from_str(text).map_err(ConfigError::InvalidJson)?;
    config.check_required()?;
    Ok(config)
}

/// Holds the active configuration and any staged override.
pub struct ConfigStore {
    active: BackendConfig,
    pending: Mutex<Option<BackendConfig>>,
}

impl ConfigStore {
    pub fn new(active: BackendConfig) -> Self {
        Self {
            active,
            pending: Mutex::new(None),
        }
    }

    pub fn active(&self) -> &BackendConfig {
        &self.active
    }

    /// Stage a replacement configuration. It becomes active only after the
    /// application restarts.
    pub fn apply_override(&self, text: &str) -> Result<(), ConfigError> {
        let config = parse_override(text)?;
        *self.pending.lock() = Some(config);
        Ok(())
    }

    pub fn pending(&self) -> Option<BackendConfig> {
        self.pending.lock().clone()
    }

    pub fn restart_required(&self) -> bool {
        self.pending.lock().is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

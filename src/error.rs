use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ValidationError / ValidationErrors
// ---------------------------------------------------------------------------

/// A single field-level validation failure, caught before any write is issued.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"Validation failed for "{}": {}"#, self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// A collection of one or more `ValidationError`s.
#[derive(Debug, Clone)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed:")?;
        for e in &self.0 {
            write!(f, "\n  - {}: {}", e.field, e.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self(vec![ValidationError {
            field: field.into(),
            reason: reason.into(),
        }])
    }
}

// ---------------------------------------------------------------------------
// ReadError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read collection \"{collection}\": {message}")]
    Backend { collection: String, message: String },

    #[error("Malformed document in \"{collection}\": {message}")]
    Malformed { collection: String, message: String },
}

// ---------------------------------------------------------------------------
// WriteError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WriteError {
    pub collection: String,
    pub id: Option<String>,
    /// The operation that was rejected: "create", "update", "delete", "set".
    pub op: &'static str,
    pub message: String,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(
                f,
                r#"{} rejected for "{}"/{}: {}"#,
                self.op, self.collection, id, self.message
            ),
            None => write!(
                f,
                r#"{} rejected for "{}": {}"#,
                self.op, self.collection, self.message
            ),
        }
    }
}

impl std::error::Error for WriteError {}

impl WriteError {
    pub fn new(
        op: &'static str,
        collection: impl Into<String>,
        id: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            id,
            op,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("Upload rejected for \"{path}\": {message}")]
pub struct UploadError {
    /// Full object path, `{folder}/{file_name}`.
    pub path: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// ImportError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No {0} data found in the seed file")]
    MissingSection(&'static str),

    #[error("Seed file is not valid JSON: {0}")]
    InvalidSeed(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Configuration is missing required field \"{0}\"")]
    MissingField(&'static str),
}

// ---------------------------------------------------------------------------
// ConsoleError — top-level rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias — the default error type is `ConsoleError`.
pub type Result<T, E = ConsoleError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

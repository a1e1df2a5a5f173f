//! Shared value-level types and helpers.
//!
//! Documents are plain `serde_json::Value` objects, field names camelCase on
//! the wire: `id`, `createdAt`, `updatedAt`, `displayOrder`.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::error::{ConsoleError, ValidationError, ValidationErrors};

// ============================================================================
// Collection Names
// ============================================================================

pub const PROJECTS: &str = "projects";
pub const CERTIFICATES: &str = "certificates";
pub const SKILLS: &str = "skills";
pub const WORK: &str = "work";
pub const EDUCATION: &str = "education";

/// The profile is a singleton document at a fixed key, not a list collection.
pub const PROFILE_COLLECTION: &str = "main";
pub const PROFILE_DOC: &str = "profile";

// ============================================================================
// Timestamps
// ============================================================================

/// Current time as an RFC 3339 string — the wire format for
/// `createdAt`/`updatedAt`. Timestamps are client-assigned, never
/// server-generated.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ============================================================================
// Document Helpers
// ============================================================================

/// The document id, if the document is an object carrying a non-empty
/// string `id` field.
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Require `value` to be a JSON object, consuming it into its map.
pub fn into_object(value: Value, what: &str) -> Result<Map<String, Value>, ConsoleError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationErrors::single(
            what,
            format!("expected a JSON object, got {}", type_name(&other)),
        )
        .into()),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Value Comparison
// ============================================================================

/// Total ordering over JSON values, backing the memory store's ordered
/// reads and the section sort fields.
///
/// Nulls (and missing fields mapped to null) sort after everything else.
/// Same-type pairs compare naturally: numbers as `f64` with NaN treated as
/// equal, strings by codepoint, `false` before `true`. Mixed-type pairs
/// fall back to a fixed rank so the result is still total.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Cross-type rank: numbers, then strings, then booleans, then containers.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        Value::Null | Value::Array(_) | Value::Object(_) => 3,
    }
}

// ============================================================================
// Local Validation
// ============================================================================

/// Check that every named field is present and non-empty before a write is
/// attempted. A failing check blocks the write client-side — no network call
/// is issued. All offending fields are accumulated.
pub fn require_fields(data: &Value, fields: &[&str]) -> Result<(), ConsoleError> {
    let mut missing = Vec::new();
    for &field in fields {
        let present = match data.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(_) => true,
        };
        if !present {
            missing.push(ValidationError {
                field: field.to_string(),
                reason: "required".to_string(),
            });
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(missing).into())
    }
}

/// Required fields checked before create/update, per collection.
/// Collections without an entry have no client-side requirements.
pub fn required_fields(collection: &str) -> &'static [&'static str] {
    match collection {
        PROJECTS => &["title", "category"],
        SKILLS => &["name", "level", "category"],
        _ => &[],
    }
}

// ============================================================================
// Tests
// ============================================================================

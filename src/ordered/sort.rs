//! Pure ordering helpers for the display-order comparator and repair
//! detection.

use std::cmp::Ordering;

use chrono::DateTime;
use serde_json::Value;

// ============================================================================
// Order Key
// ============================================================================

/// The record's `displayOrder` as a finite number.
///
/// `None` for a missing field, `null`, a non-numeric value, an unparseable
/// string, or NaN — all of the shapes external writers leave behind.
/// Numeric strings parse, since form inputs round-trip as strings.
pub fn order_key(record: &Value) -> Option<f64> {
    match record.get("displayOrder") {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// `createdAt` as epoch milliseconds: RFC 3339 string or a raw epoch-ms
/// number; anything else is treated as the epoch so legacy records sort last
/// among the undated.
pub fn created_at_ms(record: &Value) -> i64 {
    match record.get("createdAt") {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0),
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        _ => 0,
    }
}

// ============================================================================
// Comparators
// ============================================================================

/// The display-order comparator.
///
/// Both defined → numeric ascending. Exactly one defined → it sorts first
/// (explicit order beats recency). Neither defined → `createdAt` descending,
/// newest first — the tiebreak for un-ordered legacy records.
pub fn display_order_cmp(a: &Value, b: &Value) -> Ordering {
    match (order_key(a), order_key(b)) {
        (Some(ka), Some(kb)) => ka.partial_cmp(&kb).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => created_at_ms(b).cmp(&created_at_ms(a)),
    }
}

/// `createdAt` descending — the deterministic base order a repair renumbers
/// from.
pub fn created_desc_cmp(a: &Value, b: &Value) -> Ordering {
    created_at_ms(b).cmp(&created_at_ms(a))
}

// ============================================================================
// Repair Detection
// ============================================================================

/// Whether the collection's order keys violate the dense-sequence invariant.
///
/// Triggers on any undefined/null/NaN key, and also on duplicates among
/// individually-valid keys — duplicates break density just as gaps from a
/// missing key do, and the repair is a full renumbering either way.
pub fn needs_repair(records: &[Value]) -> bool {
    let mut keys = Vec::with_capacity(records.len());
    for record in records {
        match order_key(record) {
            None => return true,
            Some(k) => keys.push(k),
        }
    }
    keys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    keys.windows(2).any(|w| w[0] == w[1])
}

// ============================================================================
// Tests
// ============================================================================

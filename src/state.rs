//! Edit-mode state, tag set operations, and per-family busy flags.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

// ============================================================================
// EditState
// ============================================================================

/// Which document (if any) a form is currently working on.
///
/// One value per entity type replaces scattered parallel "new entity" /
/// "editing entity" variable pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState<T> {
    #[default]
    Idle,
    Creating(T),
    Editing {
        id: String,
        draft: T,
    },
}

impl<T> EditState<T> {
    pub fn begin_create(&mut self, draft: T) {
        *self = EditState::Creating(draft);
    }

    pub fn begin_edit(&mut self, id: impl Into<String>, draft: T) {
        *self = EditState::Editing {
            id: id.into(),
            draft,
        };
    }

    pub fn cancel(&mut self) {
        *self = EditState::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }

    /// The draft under edit, whichever mode holds one.
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self {
            EditState::Idle => None,
            EditState::Creating(draft) => Some(draft),
            EditState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        match self {
            EditState::Editing { id, .. } => Some(id),
            _ => None,
        }
    }
}

// ============================================================================
// Tag Set
// ============================================================================

/// Add `tag` to the entity's `tags` array, creating the array on demand.
/// Tags are de-duplicated; insertion order is preserved for display.
/// Returns false when the tag was already present or empty.
pub fn add_tag(entity: &mut Value, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() {
        return false;
    }
    let Some(map) = entity.as_object_mut() else {
        return false;
    };
    let tags = map
        .entry("tags".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    let Some(arr) = tags.as_array_mut() else {
        return false;
    };
    if arr.iter().any(|t| t.as_str() == Some(tag)) {
        return false;
    }
    arr.push(Value::String(tag.to_string()));
    true
}

/// Remove `tag` from the entity's `tags` array. Returns true if it was there.
pub fn remove_tag(entity: &mut Value, tag: &str) -> bool {
    let Some(arr) = entity.get_mut("tags").and_then(Value::as_array_mut) else {
        return false;
    };
    let before = arr.len();
    arr.retain(|t| t.as_str() != Some(tag));
    arr.len() != before
}

// ============================================================================
// Busy Flags
// ============================================================================

/// Operation families gated by a boolean busy flag. The flag disables
/// re-entrant triggering of the same family only — unrelated families run
/// concurrently and unsynchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpFamily {
    Login,
    Save,
    Upload,
    Reorder,
    Import,
}

#[derive(Default)]
pub struct BusyFlags {
    active: Arc<Mutex<HashSet<OpFamily>>>,
}

impl BusyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch `family` busy. Returns `None` when an operation of the same
    /// family is already in flight; the returned guard releases on drop.
    pub fn try_begin(&self, family: OpFamily) -> Option<BusyGuard> {
        let mut active = self.active.lock();
        if !active.insert(family) {
            return None;
        }
        Some(BusyGuard {
            active: Arc::clone(&self.active),
            family,
        })
    }

    pub fn is_busy(&self, family: OpFamily) -> bool {
        self.active.lock().contains(&family)
    }
}

pub struct BusyGuard {
    active: Arc<Mutex<HashSet<OpFamily>>>,
    family: OpFamily,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.active.lock().remove(&self.family);
    }
}

// ============================================================================
// Tests
// ============================================================================

//! MessageHub — ephemeral user-facing notifications.
//!
//! At most one message is visible at a time; showing a new one replaces the
//! current one. Messages expire after a fixed time-to-live (5 seconds by
//! default) and are never persisted.
//!
//! Listeners are stored as `Arc<dyn Fn(&Message)>` so snapshots are cheap.
//! Snapshot-on-emit semantics mean:
//!   - A listener removed *during* emission is still called in that round.
//!   - A listener added *during* emission is NOT called until the next emit.
//! The lock is released before any callback runs, so listeners may call
//! `on()`/`off()` freely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A listener ID returned by [`MessageHub::on`] that can be passed to
/// [`MessageHub::off`] to remove the listener.
pub type ListenerId = u64;

type ListenerFn = dyn Fn(&Message) + Send + Sync;

/// Message severity — drives how the UI renders the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub severity: Severity,
}

/// Default message time-to-live.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

pub struct MessageHub {
    current: Mutex<Option<(Message, Instant)>>,
    listeners: Mutex<Vec<(ListenerId, Arc<ListenerFn>)>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::with_ttl(MESSAGE_TTL)
    }

    /// A hub with a custom time-to-live. Tests use short TTLs.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            current: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            ttl,
        }
    }

    // -----------------------------------------------------------------------
    // Showing Messages
    // -----------------------------------------------------------------------

    /// Show a message, replacing whatever is currently visible.
    pub fn show(&self, text: impl Into<String>, severity: Severity) {
        let message = Message {
            text: text.into(),
            severity,
        };
        *self.current.lock() = Some((message.clone(), Instant::now()));
        self.emit(&message);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, Severity::Success);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, Severity::Error);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(text, Severity::Info);
    }

    /// The currently visible message, or `None` once the TTL has elapsed.
    pub fn current(&self) -> Option<Message> {
        let guard = self.current.lock();
        match guard.as_ref() {
            Some((message, shown_at)) if shown_at.elapsed() < self.ttl => Some(message.clone()),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Register `callback` to be invoked for every shown message.
    pub fn on(&self, callback: impl Fn(&Message) + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove the listener identified by `id`. Safe to call multiple times.
    pub fn off(&self, id: ListenerId) {
        self.listeners.lock().retain(|(lid, _)| *lid != id);
    }

    fn emit(&self, message: &Message) {
        // Snapshot Arc references under the lock (cheap: just ref-count bumps).
        let snapshot: Vec<Arc<ListenerFn>> = {
            let guard = self.listeners.lock();
            guard.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in snapshot {
            cb(message);
        }
    }
}

impl Default for MessageHub {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

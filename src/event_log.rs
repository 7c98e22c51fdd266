//! Render and load audit trail
//!
//! - Event: envelope with id + timestamp + kind
//! - EventKind: render, model-write and load lifecycle variants
//! - EventLog: thread-safe, append-only log shared by clone

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single event in the component log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence ID (for ordering)
    pub id: u64,
    /// Time since the log was created (ms)
    pub timestamp_ms: u64,
    /// Event type and data
    pub kind: EventKind,
}

/// All possible event types
///
/// Uses Arc<str> for component ids to enable zero-cost cloning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    // ═══════════════════════════════════════════
    // RENDER
    // ═══════════════════════════════════════════
    /// One full content replacement (pass counts from 1)
    Rendered { component: Arc<str>, pass: u64 },

    // ═══════════════════════════════════════════
    // MODEL
    // ═══════════════════════════════════════════
    ModelWritten {
        component: Arc<str>,
        key: String,
        tracked: bool,
    },

    // ═══════════════════════════════════════════
    // LOAD
    // ═══════════════════════════════════════════
    LoadStarted { component: Arc<str>, url: String },
    LoadSucceeded {
        component: Arc<str>,
        url: String,
        rows: usize,
    },
    LoadFailed {
        component: Arc<str>,
        url: String,
        error: String,
    },
}

impl EventKind {
    /// Component that emitted the event
    pub fn component(&self) -> &str {
        match self {
            Self::Rendered { component, .. }
            | Self::ModelWritten { component, .. }
            | Self::LoadStarted { component, .. }
            | Self::LoadSucceeded { component, .. }
            | Self::LoadFailed { component, .. } => component,
        }
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    /// Check if this is a load lifecycle event
    pub fn is_load_event(&self) -> bool {
        matches!(
            self,
            Self::LoadStarted { .. } | Self::LoadSucceeded { .. } | Self::LoadFailed { .. }
        )
    }
}

/// Thread-safe, append-only event log
#[derive(Clone)]
pub struct EventLog {
    events: Arc<RwLock<Vec<Event>>>,
    start_time: Instant,
    next_id: Arc<AtomicU64>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            start_time: Instant::now(),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event (thread-safe, returns event ID)
    pub fn emit(&self, kind: EventKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id,
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            kind,
        };

        self.events.write().push(event);
        id
    }

    /// Get all events (cloned)
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Filter events by component id
    pub fn filter_component(&self, component: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.component() == component)
            .collect()
    }

    /// Number of render passes recorded for a component
    pub fn render_count(&self, component: &str) -> usize {
        self.events
            .read()
            .iter()
            .filter(|e| e.kind.is_render() && e.kind.component() == component)
            .count()
    }

    /// Load lifecycle events only
    pub fn load_events(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.is_load_event())
            .collect()
    }

    /// Serialize to JSON for debugging
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.events()).unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .finish()
    }
}

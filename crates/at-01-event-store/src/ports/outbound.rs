//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the Event Store requires from its host: a durable
//! append-only line log. Production uses the JSONL adapter; tests use the
//! in-memory implementation below.

use crate::domain::errors::EventLogError;
use std::sync::{Arc, Mutex};

/// Abstract append-only line log.
///
/// Production: `JsonlEventLog` (adapters/jsonl.rs)
/// Testing: `InMemoryEventLog` (below)
pub trait EventLogBackend: Send + Sync {
    /// Persist a batch of records durably as one atomic unit.
    ///
    /// All lines are written with a single write followed by a
    /// flush-to-device. A failure must leave previously persisted records
    /// intact; the caller guarantees its in-memory state is only updated
    /// after this returns `Ok`.
    fn append_batch(&self, lines: &[String]) -> Result<(), EventLogError>;

    /// Load every surviving record line, in append order.
    fn load_lines(&self) -> Result<Vec<String>, EventLogError>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production: JsonlEventLog in adapters/jsonl.rs
// Testing: in-memory implementation below
// =============================================================================

/// Volatile backend for tests: lines live in memory, "durability" is a
/// vector push. Clones share the same storage, so a "reopened" store sees
/// what its predecessor persisted. Supports fault injection for
/// partial-persistence tests.
#[derive(Clone, Default)]
pub struct InMemoryEventLog {
    shared: Arc<LogState>,
}

#[derive(Default)]
struct LogState {
    lines: Mutex<Vec<String>>,
    fail_next: Mutex<bool>,
}

impl InMemoryEventLog {
    /// Create an empty in-memory log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `append_batch` fail, simulating a torn write.
    pub fn fail_next_append(&self) {
        *self.shared.fail_next.lock().expect("poisoned") = true;
    }

    /// Snapshot of the stored lines.
    pub fn lines(&self) -> Vec<String> {
        self.shared.lines.lock().expect("poisoned").clone()
    }

    /// Overwrite the stored lines, simulating external tampering.
    pub fn set_lines(&self, lines: Vec<String>) {
        *self.shared.lines.lock().expect("poisoned") = lines;
    }
}

impl EventLogBackend for InMemoryEventLog {
    fn append_batch(&self, lines: &[String]) -> Result<(), EventLogError> {
        let mut fail = self.shared.fail_next.lock().expect("poisoned");
        if *fail {
            *fail = false;
            return Err(EventLogError::Io {
                message: "injected append failure".to_string(),
            });
        }
        self.shared
            .lines
            .lock()
            .expect("poisoned")
            .extend(lines.iter().cloned());
        Ok(())
    }

    fn load_lines(&self) -> Result<Vec<String>, EventLogError> {
        Ok(self.lines())
    }
}

//! # Snapshot Store
//!
//! Content-addressed subsystem snapshots. A snapshot is an opaque
//! serializable state plus the SHA-256 of its canonical form; verification
//! recomputes the digest, so tampered state is always detected.

use crate::domain::errors::EventStoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_crypto::hash_canonical;
use shared_types::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A saved snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Stream the state was folded from.
    pub stream_id: String,
    /// Stream version the state reflects.
    pub version: u64,
    /// Opaque subsystem state.
    pub state: Value,
    /// SHA-256 of the canonical form of `state`.
    pub state_hash: String,
    /// RFC 3339 creation instant.
    pub created_at: String,
}

/// Input to [`SnapshotStore::save`].
#[derive(Clone, Debug)]
pub struct SnapshotInput {
    /// Stream the state was folded from.
    pub stream_id: String,
    /// Stream version the state reflects.
    pub version: u64,
    /// Opaque subsystem state.
    pub state: Value,
}

/// Content-addressed snapshot persistence.
pub trait SnapshotStore: Send + Sync {
    /// Compute the state hash, stamp `created_at`, and record the snapshot
    /// as the latest for its stream.
    fn save(&self, input: SnapshotInput) -> Result<Snapshot, EventStoreError>;

    /// Latest snapshot for a stream, if any.
    fn load(&self, stream_id: &str) -> Option<Snapshot>;

    /// Recompute the state hash and compare. Pure; no side effects.
    fn verify_integrity(&self, snapshot: &Snapshot) -> bool {
        hash_canonical(&snapshot.state)
            .map(|recomputed| recomputed == snapshot.state_hash)
            .unwrap_or(false)
    }
}

/// In-memory snapshot store; one latest snapshot per stream.
pub struct InMemorySnapshotStore {
    clock: Arc<dyn Clock>,
    snapshots: Mutex<HashMap<String, Snapshot>>,
}

impl InMemorySnapshotStore {
    /// Create with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create with an explicit clock (deterministic tests).
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            snapshots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, input: SnapshotInput) -> Result<Snapshot, EventStoreError> {
        let state_hash = hash_canonical(&input.state)?;
        let snapshot = Snapshot {
            stream_id: input.stream_id.clone(),
            version: input.version,
            state: input.state,
            state_hash,
            created_at: self.clock.now_rfc3339(),
        };
        self.snapshots
            .lock()
            .expect("snapshot lock poisoned")
            .insert(input.stream_id, snapshot.clone());
        Ok(snapshot)
    }

    fn load(&self, stream_id: &str) -> Option<Snapshot> {
        self.snapshots
            .lock()
            .expect("snapshot lock poisoned")
            .get(stream_id)
            .cloned()
    }
}

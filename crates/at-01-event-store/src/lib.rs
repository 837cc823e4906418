//! # Event Store (at-01)
//!
//! The Event Store is the authoritative record of every state change in the
//! business domain. Events are appended to named streams, receive dense
//! per-stream versions and a dense global position, and are linked into a
//! single SHA-256 hash chain in global-position order. Any party holding the
//! log can recompute every link and detect tampering.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Dense Versions | A stream with highest version N holds exactly 1..N |
//! | 2 | Dense Positions | N events total occupy global positions 1..N |
//! | 3 | Immutable Slots | (streamId, version) never maps to two events |
//! | 4 | Chain Integrity | Every selfHash recomputes; prevHash links hold |
//! | 5 | Persist Before Index | Durable write + fsync precedes memory update |
//! | 6 | Dispatch After Persist | Subscribers run after durability, in order |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, hash-chain math, errors
//! - `ports/` - Inbound API trait, outbound log backend + clock
//! - `adapters/` - Durable JSONL backend (append-only, fsync, fs2 lock)
//! - `service/` - The `EventStore` application service and snapshot sibling
//!
//! ## Usage
//!
//! ```ignore
//! use at_01_event_store::{EventStore, EventStoreConfig, JsonlEventLog};
//!
//! let backend = JsonlEventLog::open("/var/lib/attestia/events.jsonl")?;
//! let store = EventStore::open(backend, EventStoreConfig::default())?;
//!
//! let result = store.append("vault:v1", vec![event], AppendOptions::default())?;
//! let report = store.verify_integrity();
//! assert!(report.valid);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::jsonl::JsonlEventLog;
pub use domain::entities::{
    AppendOptions, AppendResult, EventStoreConfig, ExpectedVersion, IntegrityReport,
    IntegrityViolation, ReadAllOptions, ReadDirection, ReadOptions, StoredEvent,
};
pub use domain::errors::{EventLogError, EventStoreError};
pub use domain::hash_chain::compute_self_hash;
pub use ports::inbound::EventStoreApi;
pub use ports::outbound::{EventLogBackend, InMemoryEventLog};
pub use service::snapshots::{InMemorySnapshotStore, Snapshot, SnapshotInput, SnapshotStore};
pub use service::{EventHandler, EventStore, SubscriptionId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

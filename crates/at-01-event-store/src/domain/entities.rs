//! # Domain Entities
//!
//! Stored events, append/read options, and integrity reports.

use serde::{Deserialize, Serialize};
use shared_types::Event;

/// An event as it exists inside the log: the domain event plus its
/// placement (stream, version, global position) and chain links.
///
/// The wire form of this struct is the durable on-disk format: one
/// canonical-JSON line per stored event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    /// The domain event.
    pub event: Event,
    /// Owning stream.
    pub stream_id: String,
    /// 1-based version, dense within the stream.
    pub version: u64,
    /// 1-based position, dense across all streams.
    pub global_position: u64,
    /// RFC 3339 instant the append was accepted.
    pub appended_at: String,
    /// Hash of the previous event in global order (hash-chain mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_hash: Option<String>,
    /// This event's own chain hash (hash-chain mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_hash: Option<String>,
}

/// Optimistic-concurrency expectation for an append.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// No expectation; always append.
    #[default]
    Any,
    /// The stream must not exist yet.
    NoStream,
    /// The stream must currently be at exactly this version.
    Exact(u64),
}

/// Options for [`append`](crate::EventStore::append).
#[derive(Clone, Copy, Debug, Default)]
pub struct AppendOptions {
    /// Optimistic-concurrency guard.
    pub expected_version: ExpectedVersion,
}

impl AppendOptions {
    /// Expect the stream to not exist.
    pub fn no_stream() -> Self {
        Self {
            expected_version: ExpectedVersion::NoStream,
        }
    }

    /// Expect the stream to be at exactly `version`.
    pub fn exact(version: u64) -> Self {
        Self {
            expected_version: ExpectedVersion::Exact(version),
        }
    }
}

/// Outcome of a successful append.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResult {
    /// Stream appended to.
    pub stream_id: String,
    /// Version of the first appended event.
    pub from_version: u64,
    /// Version of the last appended event.
    pub to_version: u64,
    /// Number of events appended.
    pub count: u64,
}

/// Read direction for stream and global reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadDirection {
    /// Ascending version / position order.
    #[default]
    Forward,
    /// Descending order.
    Backward,
}

/// Options for reading a single stream.
#[derive(Clone, Copy, Debug)]
pub struct ReadOptions {
    /// Forward: lowest version to return. Backward: highest.
    pub from_version: u64,
    /// Maximum events to return; unlimited when `None`.
    pub max_count: Option<usize>,
    /// Read direction.
    pub direction: ReadDirection,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            from_version: 1,
            max_count: None,
            direction: ReadDirection::Forward,
        }
    }
}

/// Options for reading the global log.
#[derive(Clone, Copy, Debug)]
pub struct ReadAllOptions {
    /// Forward: lowest position to return. Backward: highest.
    pub from_position: u64,
    /// Maximum events to return; unlimited when `None`.
    pub max_count: Option<usize>,
    /// Read direction.
    pub direction: ReadDirection,
}

impl Default for ReadAllOptions {
    fn default() -> Self {
        Self {
            from_position: 1,
            max_count: None,
            direction: ReadDirection::Forward,
        }
    }
}

/// A single anomaly found while walking the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityViolation {
    /// Global position of the offending event.
    pub global_position: u64,
    /// Human-readable description of what failed to verify.
    pub detail: String,
}

/// Result of a full integrity walk over the global log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// True when every link and every recomputation held.
    pub valid: bool,
    /// Last global position that verified cleanly.
    pub last_verified_position: u64,
    /// Every anomaly found; never silently dropped.
    pub errors: Vec<IntegrityViolation>,
}

/// Event store configuration. Passed explicitly; no module-level globals.
#[derive(Clone, Copy, Debug)]
pub struct EventStoreConfig {
    /// When true (the default), every stored event carries prevHash and
    /// selfHash links.
    pub hash_chain: bool,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self { hash_chain: true }
    }
}

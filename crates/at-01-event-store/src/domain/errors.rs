//! # Domain Errors
//!
//! Error types for the Event Store subsystem. Validation and concurrency
//! failures report synchronously and never mutate state; persistence
//! failures surface the underlying cause.

use shared_crypto::CanonicalError;
use thiserror::Error;

/// Errors surfaced by event store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    /// Stream id was empty.
    #[error("Stream id must be a non-empty string")]
    InvalidStreamId,

    /// Append called with no events.
    #[error("Cannot append an empty event list to stream {stream_id:?}")]
    EmptyAppend {
        /// Target stream.
        stream_id: String,
    },

    /// Read called with a version below 1.
    #[error("Version must be >= 1, got {requested}")]
    InvalidVersion {
        /// The out-of-range version.
        requested: u64,
    },

    /// Expected-version guard did not hold.
    #[error("Concurrency conflict on stream {stream_id:?}: expected {expected}, actual version {actual}")]
    ConcurrencyConflict {
        /// Target stream.
        stream_id: String,
        /// Human-readable expectation (`"no_stream"`, `"3"`, ...).
        expected: String,
        /// Actual current version of the stream.
        actual: u64,
    },

    /// An event could not be canonicalized for hashing or persistence.
    #[error("Event is not canonicalizable: {0}")]
    Canonical(#[from] CanonicalError),

    /// The durable backend rejected the write; in-memory state is unchanged.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] EventLogError),
}

impl EventStoreError {
    /// Stable error discriminant surfaced through every interface.
    pub fn code(&self) -> &'static str {
        match self {
            EventStoreError::InvalidStreamId => "INVALID_STREAM_ID",
            EventStoreError::EmptyAppend { .. } => "EMPTY_APPEND",
            EventStoreError::InvalidVersion { .. } => "INVALID_VERSION",
            EventStoreError::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            EventStoreError::Canonical(_) => "VALIDATION_FAILED",
            EventStoreError::Persistence(_) => "PERSISTENCE_FAILED",
        }
    }
}

/// Durable log backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventLogError {
    /// I/O failure while appending or loading.
    #[error("Event log I/O error: {message}")]
    Io {
        /// Underlying error description.
        message: String,
    },

    /// Another store instance already owns the backing file.
    #[error("Event log file is locked by another instance: {path}")]
    Locked {
        /// Path of the contested file.
        path: String,
    },
}

impl From<std::io::Error> for EventLogError {
    fn from(err: std::io::Error) -> Self {
        EventLogError::Io {
            message: err.to_string(),
        }
    }
}

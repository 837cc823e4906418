//! # Shared Domain Errors
//!
//! Error types for entities defined in this crate. Every externally
//! meaningful variant carries a stable discriminant string via `code()`.

use thiserror::Error;

/// Rejected intent lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid intent transition: {from} -> {to}")]
pub struct IntentTransitionError {
    /// Current status.
    pub from: String,
    /// Attempted status.
    pub to: String,
}

impl IntentTransitionError {
    /// Stable error discriminant.
    pub fn code(&self) -> &'static str {
        "INVALID_TRANSITION"
    }
}

/// Malformed chain reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainRefError {
    /// The reference did not contain a `namespace:reference` pair.
    #[error("Chain reference must be <namespace>:<reference>, got {0:?}")]
    MissingSeparator(String),

    /// Namespace or reference segment was empty.
    #[error("Chain reference has an empty segment: {0:?}")]
    EmptySegment(String),
}

impl ChainRefError {
    /// Stable error discriminant.
    pub fn code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }
}

//! # Domain Errors
//!
//! Rejection classifications and registry errors. Rejections are data, not
//! exceptions: a rejected transition reports every violation it committed
//! and leaves the registry untouched.

use serde::{Deserialize, Serialize};
use shared_crypto::CanonicalError;
use thiserror::Error;

/// Why a transition was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationClass {
    /// A root declaration for an id that is already registered.
    Halt,
    /// A non-root state arrived without a parent declaration, or the
    /// declared parent does not match the state's own id.
    ExplicitLineage,
    /// The declared parent is not in the registry.
    UnknownParent,
    /// The state id is empty.
    EmptyId,
}

impl ViolationClass {
    /// Stable discriminant string.
    pub fn code(self) -> &'static str {
        match self {
            ViolationClass::Halt => "HALT",
            ViolationClass::ExplicitLineage => "EXPLICIT_LINEAGE",
            ViolationClass::UnknownParent => "UNKNOWN_PARENT",
            ViolationClass::EmptyId => "EMPTY_ID",
        }
    }
}

/// One concrete violation inside a rejection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Classification of the violation.
    pub classification: ViolationClass,
    /// Human-readable description.
    pub detail: String,
}

impl Violation {
    /// Construct a violation.
    pub fn new(classification: ViolationClass, detail: impl Into<String>) -> Self {
        Self {
            classification,
            detail: detail.into(),
        }
    }
}

/// Registry-level errors (outside the accept/reject protocol).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrumError {
    /// A state or snapshot could not be canonicalized for hashing.
    #[error("Registry state is not canonicalizable: {0}")]
    Canonical(#[from] CanonicalError),
}

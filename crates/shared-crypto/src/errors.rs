//! # Canonicalization Errors
//!
//! Failure modes of the canonical JSON encoder.

use thiserror::Error;

/// Errors raised while producing the canonical form of a value.
///
/// The canonicalizer is the single source of truth for digest inputs, so a
/// silent coercion here would corrupt every downstream hash. Each failure is
/// surfaced as a typed error instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    /// NaN or infinity has no JSON representation.
    #[error("Non-finite number cannot be canonicalized")]
    NonFiniteNumber,

    /// The value could not be converted into a JSON tree.
    #[error("Value is not JSON-compatible: {0}")]
    NotJsonCompatible(String),

    /// Canonical bytes failed to re-parse (round-trip check).
    #[error("Canonical form failed to parse: {0}")]
    Unparseable(String),
}

//! # Bundle & Consensus Errors

use shared_crypto::CanonicalError;
use thiserror::Error;

/// Bundle assembly/replay failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    /// A snapshot could not be canonicalized for hashing.
    #[error("Bundle content is not canonicalizable: {0}")]
    Canonical(#[from] CanonicalError),
}

/// Verifier report aggregation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// Two reports share a report id.
    #[error("Duplicate verifier report id {report_id:?}")]
    DuplicateReportId {
        /// The repeated id.
        report_id: String,
    },

    /// No reports were submitted.
    #[error("Cannot aggregate an empty report set")]
    EmptyReportSet,
}

impl ConsensusError {
    /// Stable error discriminant.
    pub fn code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }
}

//! # Governance Errors
//!
//! Typed rejections for governance mutations and checks. Rejected
//! mutations never touch the event log or the version counter.

use thiserror::Error;

/// Errors surfaced by the governance store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    /// Signer address already present.
    #[error("Signer already exists: {address}")]
    SignerExists {
        /// Offending address.
        address: String,
    },

    /// Signer address not present.
    #[error("Signer not found: {address}")]
    SignerNotFound {
        /// Missing address.
        address: String,
    },

    /// Signer weight below 1.
    #[error("Signer weight must be >= 1, got {weight}")]
    InvalidWeight {
        /// Offending weight.
        weight: u64,
    },

    /// Quorum out of bounds for the current signer set.
    #[error("Quorum must be between 1 and {total_weight}, got {requested}")]
    InvalidQuorum {
        /// Requested quorum.
        requested: u64,
        /// Current total signer weight.
        total_weight: u64,
    },

    /// Removal would leave less weight than the quorum requires.
    #[error("Removing {address} drops total weight to {remaining_weight}, below quorum {quorum}")]
    RemovalBreaksQuorum {
        /// Signer whose removal was rejected.
        address: String,
        /// Weight that would remain.
        remaining_weight: u64,
        /// Current quorum.
        quorum: u64,
    },

    /// SLA policy fields out of range.
    #[error("Invalid SLA policy: {detail}")]
    InvalidSlaPolicy {
        /// What was out of range.
        detail: String,
    },

    /// Attestation throughput missed the SLA target.
    #[error("SLA {policy_id} violated: attested {actual} of target {target}")]
    SlaViolation {
        /// Violated policy.
        policy_id: String,
        /// Required count.
        target: u64,
        /// Observed count.
        actual: u64,
    },
}

impl GovernanceError {
    /// Stable error discriminant surfaced through every interface.
    pub fn code(&self) -> &'static str {
        match self {
            GovernanceError::SignerExists { .. }
            | GovernanceError::SignerNotFound { .. }
            | GovernanceError::InvalidWeight { .. }
            | GovernanceError::InvalidQuorum { .. }
            | GovernanceError::RemovalBreaksQuorum { .. }
            | GovernanceError::InvalidSlaPolicy { .. } => "VALIDATION_FAILED",
            GovernanceError::SlaViolation { .. } => "SLA_VIOLATION",
        }
    }
}

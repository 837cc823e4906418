//! # Witness Errors
//!
//! Submission, memo, and verification failures. Submit exhaustion carries
//! the original payload and attempt count so the caller can retry later
//! without rebuilding anything.

use crate::payload::WitnessPayload;
use shared_crypto::CanonicalError;
use thiserror::Error;

/// Wire memo encode/decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoError {
    /// The memo type tag is not `attestia/witness/v1`.
    #[error("Not an attestia witness memo (MemoType {memo_type:?})")]
    ForeignMemoType {
        /// The hex tag that was found.
        memo_type: String,
    },

    /// MemoData is not valid hex.
    #[error("Memo data is not valid hex: {detail}")]
    InvalidHex {
        /// Decoder error.
        detail: String,
    },

    /// MemoData decoded but is not a payload.
    #[error("Memo data is not a witness payload: {detail}")]
    InvalidJson {
        /// Parser error.
        detail: String,
    },

    /// The payload could not be canonicalized for encoding.
    #[error("Payload is not canonicalizable: {0}")]
    Canonical(#[from] CanonicalError),
}

/// Errors surfaced by the witness pipeline.
#[derive(Debug, Error)]
pub enum WitnessError {
    /// Every submission attempt failed; the payload is preserved.
    #[error("Witness submission failed after {attempts} attempt(s): {last_error}")]
    SubmitFailed {
        /// The payload that was being anchored.
        payload: Box<WitnessPayload>,
        /// Attempts made before giving up.
        attempts: u32,
        /// The final error, preserved verbatim.
        last_error: String,
    },

    /// The collected signers do not form a quorum under the policy.
    #[error("Multi-sign quorum not met: collected weight {collected_weight}, quorum {quorum}")]
    QuorumNotMet {
        /// Weight of the recognized collected signers.
        collected_weight: u64,
        /// Required quorum.
        quorum: u64,
    },

    /// The operation was cancelled by its deadline.
    #[error("Witness operation cancelled by deadline")]
    Cancelled,

    /// Wire memo failure.
    #[error(transparent)]
    Memo(#[from] MemoError),

    /// Payload hashing failure.
    #[error("Payload is not canonicalizable: {0}")]
    Canonical(#[from] CanonicalError),

    /// Ledger read failure during verification.
    #[error("Ledger read failed: {detail}")]
    LedgerRead {
        /// Underlying error description.
        detail: String,
    },
}

impl WitnessError {
    /// Stable error discriminant surfaced through every interface.
    pub fn code(&self) -> &'static str {
        match self {
            WitnessError::SubmitFailed { .. } => "WITNESS_SUBMIT_FAILED",
            WitnessError::QuorumNotMet { .. } => "QUORUM_NOT_MET",
            WitnessError::Cancelled => "CANCELLED",
            WitnessError::Memo(_) | WitnessError::Canonical(_) => "VALIDATION_FAILED",
            WitnessError::LedgerRead { .. } => "NETWORK_FAILED",
        }
    }
}

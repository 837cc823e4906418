//! # Reconciliation Errors
//!
//! Amount-parse failures and report-level errors. Inside the matchers a
//! bad amount never aborts the run; it degrades into an amount-mismatch
//! with the parse failure in the discrepancy text.

use shared_crypto::CanonicalError;
use thiserror::Error;

/// Decimal/raw amount parse and scale failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Not a valid decimal-string amount.
    #[error("Invalid decimal amount {value:?}")]
    InvalidDecimal {
        /// Rejected input.
        value: String,
    },

    /// Not a valid raw integer amount.
    #[error("Invalid raw integer amount {value:?}")]
    InvalidInteger {
        /// Rejected input.
        value: String,
    },

    /// More fractional digits than the declared decimals allow.
    #[error("Amount {value:?} exceeds {decimals} decimal(s) of precision")]
    PrecisionExceeded {
        /// Rejected input.
        value: String,
        /// Declared decimals.
        decimals: u32,
    },

    /// Scaled magnitude exceeds 256 bits.
    #[error("Amount {value:?} overflows at {decimals} decimal(s)")]
    Overflow {
        /// Rejected input.
        value: String,
        /// Decimals at which the overflow happened.
        decimals: u32,
    },
}

impl AmountError {
    /// Stable error discriminant.
    pub fn code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }
}

/// Report-level reconciliation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// Amount handling failed outside a matcher.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// A report or record could not be canonicalized for hashing.
    #[error("Report is not canonicalizable: {0}")]
    Canonical(#[from] CanonicalError),
}

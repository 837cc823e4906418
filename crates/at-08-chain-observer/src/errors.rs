//! # Observer Errors

use thiserror::Error;

/// Errors surfaced by chain observation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserverError {
    /// The queried address is unknown to this observer.
    #[error("Unknown address: {address}")]
    UnknownAddress {
        /// Queried address.
        address: String,
    },

    /// The queried token is not tracked on this chain.
    #[error("Unknown token {symbol} for address {address}")]
    UnknownToken {
        /// Queried address.
        address: String,
        /// Queried token symbol.
        symbol: String,
    },

    /// Transport failure talking to the chain.
    #[error("Chain read failed: {message}")]
    Network {
        /// Underlying error description.
        message: String,
    },

    /// The read was cancelled by its deadline.
    #[error("Chain read cancelled")]
    Cancelled,
}

impl ObserverError {
    /// Stable error discriminant.
    pub fn code(&self) -> &'static str {
        match self {
            ObserverError::UnknownAddress { .. } | ObserverError::UnknownToken { .. } => {
                "VALIDATION_FAILED"
            }
            ObserverError::Network { .. } => "NETWORK_FAILED",
            ObserverError::Cancelled => "CANCELLED",
        }
    }
}

//! # Chain References
//!
//! CAIP-2-like chain identifiers: a namespace and a chain-specific
//! reference joined by a colon (`eip155:1`, `xrpl:mainnet`,
//! `solana:mainnet-beta`).

use crate::errors::ChainRefError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// EVM chain namespace.
pub const NAMESPACE_EIP155: &str = "eip155";
/// XRP Ledger namespace.
pub const NAMESPACE_XRPL: &str = "xrpl";
/// Solana namespace.
pub const NAMESPACE_SOLANA: &str = "solana";

/// A parsed chain identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainRef {
    namespace: String,
    reference: String,
}

impl ChainRef {
    /// Parse a `namespace:reference` pair.
    pub fn parse(value: &str) -> Result<Self, ChainRefError> {
        let (namespace, reference) = value
            .split_once(':')
            .ok_or_else(|| ChainRefError::MissingSeparator(value.to_string()))?;
        if namespace.is_empty() || reference.is_empty() {
            return Err(ChainRefError::EmptySegment(value.to_string()));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            reference: reference.to_string(),
        })
    }

    /// Chain namespace (`eip155`, `xrpl`, `solana`, ...).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Chain-specific reference (`1`, `mainnet`, ...).
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Whether this chain lives in the given namespace.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for ChainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl TryFrom<String> for ChainRef {
    type Error = ChainRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChainRef> for String {
    fn from(value: ChainRef) -> Self {
        value.to_string()
    }
}

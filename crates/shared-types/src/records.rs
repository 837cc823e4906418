//! # Reconcilable Records
//!
//! The three record families the reconciler matches against each other:
//! declared intents, ledger postings, and observed on-chain transfers.

use crate::chain::ChainRef;
use crate::errors::IntentTransitionError;
use serde::{Deserialize, Serialize};

/// A monetary amount in a named currency at a fixed decimal precision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal-string amount (`"1.000000"`).
    pub amount: String,
    /// Currency or token symbol.
    pub currency: String,
    /// Number of decimal places the currency carries.
    pub decimals: u32,
}

impl Money {
    /// Convenience constructor.
    pub fn new(amount: impl Into<String>, currency: impl Into<String>, decimals: u32) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
            decimals,
        }
    }
}

/// Lifecycle of a payment intent.
///
/// ```text
/// Declared ──→ Executing ──→ Executed
///                  │
///                  └────────→ Failed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    /// Declared, not yet executing.
    Declared,
    /// Execution in flight.
    Executing,
    /// Executed on chain.
    Executed,
    /// Execution failed.
    Failed,
}

impl IntentStatus {
    /// Whether this status may move to `next`.
    pub fn can_transition_to(self, next: IntentStatus) -> bool {
        matches!(
            (self, next),
            (IntentStatus::Declared, IntentStatus::Executing)
                | (IntentStatus::Executing, IntentStatus::Executed)
                | (IntentStatus::Executing, IntentStatus::Failed)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            IntentStatus::Declared => "declared",
            IntentStatus::Executing => "executing",
            IntentStatus::Executed => "executed",
            IntentStatus::Failed => "failed",
        }
    }
}

/// A declared movement of value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Intent identity.
    pub id: String,
    /// Lifecycle status.
    pub status: IntentStatus,
    /// RFC 3339 declaration instant.
    pub declared_at: String,
    /// Target chain, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainRef>,
    /// Correlation id shared with ledger postings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Declared amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    /// Transaction hash from the execution record, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl Intent {
    /// Move the intent along its lifecycle, rejecting illegal jumps.
    pub fn transition_to(&mut self, next: IntentStatus) -> Result<(), IntentTransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(IntentTransitionError {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// A posting in the internal ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Posting identity.
    pub id: String,
    /// Correlation id shared with the intent that caused the posting.
    pub correlation_id: String,
    /// Posted amount.
    pub money: Money,
    /// RFC 3339 posting instant.
    pub timestamp: String,
    /// Anchoring transaction hash, when the posting settled on chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// An observed on-chain transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEvent {
    /// Chain the transfer happened on.
    pub chain_id: ChainRef,
    /// Transaction hash.
    pub tx_hash: String,
    /// Sending address.
    pub from: String,
    /// Receiving address.
    pub to: String,
    /// Raw integer amount in the token's smallest unit.
    pub amount: String,
    /// Token decimals.
    pub decimals: u32,
    /// Token symbol.
    pub symbol: String,
    /// RFC 3339 observation instant.
    pub timestamp: String,
}

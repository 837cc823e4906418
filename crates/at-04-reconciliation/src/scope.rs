//! # Reconciliation Scope
//!
//! Slice filtering before the matchers run. Timestamps are RFC 3339 UTC in
//! one canonical rendering, so lexicographic comparison is chronological.

use serde::{Deserialize, Serialize};
use shared_types::{ChainEvent, ChainRef, Intent, LedgerEntry};

/// Which subset of records a run covers. Empty scope covers everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationScope {
    /// Restrict to one chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<ChainRef>,
    /// Restrict to one correlation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Restrict to one intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_id: Option<String>,
    /// Inclusive window start (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Inclusive window end (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl ReconciliationScope {
    fn in_window(&self, timestamp: &str) -> bool {
        if let Some(from) = &self.from {
            if timestamp < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.to {
            if timestamp > to.as_str() {
                return false;
            }
        }
        true
    }

    /// Intents this scope covers.
    pub fn filter_intents<'a>(&self, intents: &'a [Intent]) -> Vec<&'a Intent> {
        intents
            .iter()
            .filter(|intent| {
                self.intent_id
                    .as_ref()
                    .map_or(true, |id| &intent.id == id)
                    && self
                        .correlation_id
                        .as_ref()
                        .map_or(true, |c| intent.correlation_id.as_ref() == Some(c))
                    && self
                        .chain_id
                        .as_ref()
                        .map_or(true, |chain| intent.chain_id.as_ref() == Some(chain))
                    && self.in_window(&intent.declared_at)
            })
            .collect()
    }

    /// Ledger entries this scope covers.
    pub fn filter_ledger<'a>(&self, entries: &'a [LedgerEntry]) -> Vec<&'a LedgerEntry> {
        entries
            .iter()
            .filter(|entry| {
                self.correlation_id
                    .as_ref()
                    .map_or(true, |c| &entry.correlation_id == c)
                    && self.in_window(&entry.timestamp)
            })
            .collect()
    }

    /// Chain events this scope covers.
    pub fn filter_chain<'a>(&self, events: &'a [ChainEvent]) -> Vec<&'a ChainEvent> {
        events
            .iter()
            .filter(|event| {
                self.chain_id
                    .as_ref()
                    .map_or(true, |chain| &event.chain_id == chain)
                    && self.in_window(&event.timestamp)
            })
            .collect()
    }
}

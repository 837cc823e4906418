//! # Match Records & Reports
//!
//! The result vocabulary of a reconciliation run. Wall-clock fields (id,
//! timestamp) are caller-overridable so two runs over the same inputs can
//! produce byte-identical reports.

use crate::scope::ReconciliationScope;
use serde::{Deserialize, Serialize};

/// Outcome of one pairing attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    /// Both sides present, amounts equal in the common basis.
    Matched,
    /// Both sides present, amounts or currencies disagree.
    AmountMismatch,
    /// The referenced chain event does not exist.
    MissingChain,
    /// A chain event no ledger entry accounts for.
    MissingLedger,
    /// A ledger posting no intent declared.
    MissingIntent,
}

impl MatchStatus {
    /// Whether this status counts into the `missing` tally.
    pub fn is_missing(self) -> bool {
        matches!(
            self,
            MatchStatus::MissingChain | MatchStatus::MissingLedger | MatchStatus::MissingIntent
        )
    }
}

/// Ledger ↔ chain pairing record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerChainMatch {
    /// Ledger entry side; absent for `missing-ledger` records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_entry_id: Option<String>,
    /// The transaction hash both sides reference.
    pub tx_hash: String,
    /// Pairing outcome.
    pub status: MatchStatus,
    /// Human-readable comparison details.
    pub discrepancies: Vec<String>,
}

/// Intent ↔ ledger pairing record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentLedgerMatch {
    /// Intent side; absent for `missing-intent` records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_id: Option<String>,
    /// Ledger side; absent for `missing-ledger` records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_entry_id: Option<String>,
    /// Correlation id the join used, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Pairing outcome.
    pub status: MatchStatus,
    /// Human-readable comparison details.
    pub discrepancies: Vec<String>,
}

/// Intent ↔ chain pairing record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentChainMatch {
    /// Intent side.
    pub intent_id: String,
    /// Transaction hash from the intent's execution record, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Pairing outcome.
    pub status: MatchStatus,
    /// Human-readable comparison details.
    pub discrepancies: Vec<String>,
}

/// Tallies across all three matchers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    /// Intents in scope.
    pub total_intents: u64,
    /// Ledger entries in scope.
    pub total_ledger_entries: u64,
    /// Chain events in scope.
    pub total_chain_events: u64,
    /// `matched` records across all matchers.
    pub matched: u64,
    /// `amount-mismatch` records across all matchers.
    pub mismatch: u64,
    /// `missing-*` records across all matchers.
    pub missing: u64,
    /// True iff `mismatch == 0` and `missing == 0`.
    pub all_reconciled: bool,
    /// Every discrepancy string, in match order. Never silently dropped.
    pub discrepancies: Vec<String>,
}

/// The assembled result of one reconciliation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Report id (`recon:{epochMillis}:{counter}` unless overridden).
    pub id: String,
    /// Scope the input slices were filtered by.
    pub scope: ReconciliationScope,
    /// RFC 3339 run instant.
    pub timestamp: String,
    /// Intent ↔ ledger pairings.
    pub intent_ledger_matches: Vec<IntentLedgerMatch>,
    /// Ledger ↔ chain pairings.
    pub ledger_chain_matches: Vec<LedgerChainMatch>,
    /// Intent ↔ chain pairings.
    pub intent_chain_matches: Vec<IntentChainMatch>,
    /// Tallies.
    pub summary: ReconciliationSummary,
}

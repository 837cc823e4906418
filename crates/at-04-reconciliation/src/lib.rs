//! # Reconciler (at-04)
//!
//! Three-way matching between declared intents, ledger postings, and
//! observed on-chain transfers. All matchers are pure: they take scoped
//! read-only slices and return match records; report assembly tallies them
//! into a summary any external party can recompute.
//!
//! ## Matching Topology
//!
//! ```text
//! Intent ←──correlationId──→ LedgerEntry ←──txHash──→ ChainEvent
//!    └───────────(chainId, txHash)──────────────────────────┘
//! ```
//!
//! Amount comparisons always happen in a common decimal basis: both sides
//! are scaled to `max(decimals)` as big integers, so `"1.000000"` at 6
//! decimals equals `"1000000000000000000"` raw at 18.
//!
//! ## Module Structure
//!
//! - `amounts` - Sign-aware U256 decimal parsing and rescaling
//! - `scope` - Read-slice filtering (chain, correlation, intent, window)
//! - `matchers/` - The three pure matchers
//! - `report` - Match records, summary, report assembly types
//! - `cross_chain` - Settlement pairs, double-count dedup, event linking
//! - `attestor` - Attestation records over finished reports
//! - `service` - The `Reconciler` that orchestrates a run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod amounts;
pub mod attestor;
pub mod cross_chain;
pub mod errors;
pub mod matchers;
pub mod report;
pub mod scope;
pub mod service;

// Re-exports
pub use amounts::{amounts_equal, parse_decimal, parse_raw, ScaledAmount};
pub use attestor::{AttestationRecord, Attestor};
pub use cross_chain::{
    is_settlement_pair, link_cross_chain_events, prevent_double_counting, CrossChainLink,
    DedupResult, EventKey, LinkConfidence, LinkType,
};
pub use errors::{AmountError, ReconciliationError};
pub use matchers::{match_intents_to_chain, match_intents_to_ledger, match_ledger_to_chain};
pub use report::{
    IntentChainMatch, IntentLedgerMatch, LedgerChainMatch, MatchStatus, ReconciliationReport,
    ReconciliationSummary,
};
pub use scope::ReconciliationScope;
pub use service::{ReconcileOptions, Reconciler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # Reconciler Service
//!
//! Orchestrates one reconciliation run: scope the slices, run the three
//! matchers, tally the summary. Everything below the id/timestamp stamping
//! is pure, so runs with pinned options are byte-identical.

use crate::matchers::{match_intents_to_chain, match_intents_to_ledger, match_ledger_to_chain};
use crate::report::{MatchStatus, ReconciliationReport, ReconciliationSummary};
use crate::scope::ReconciliationScope;
use shared_types::{epoch_millis, ChainEvent, Clock, Intent, LedgerEntry, SystemClock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Caller overrides for deterministic report assembly.
#[derive(Clone, Debug, Default)]
pub struct ReconcileOptions {
    /// Use this report id instead of `recon:{epochMillis}:{counter}`.
    pub report_id: Option<String>,
    /// Use this RFC 3339 timestamp instead of the clock.
    pub timestamp: Option<String>,
}

/// Three-way reconciliation runner.
pub struct Reconciler {
    clock: Arc<dyn Clock>,
    counter: AtomicU64,
}

impl Reconciler {
    /// Create a reconciler with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a reconciler with an explicit clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            counter: AtomicU64::new(0),
        }
    }

    /// Run the three matchers over the scoped slices and assemble the
    /// report.
    pub fn reconcile(
        &self,
        scope: ReconciliationScope,
        intents: &[Intent],
        entries: &[LedgerEntry],
        events: &[ChainEvent],
        options: ReconcileOptions,
    ) -> ReconciliationReport {
        let scoped_intents = scope.filter_intents(intents);
        let scoped_entries = scope.filter_ledger(entries);
        let scoped_events = scope.filter_chain(events);

        let intent_ledger_matches =
            match_intents_to_ledger(&scoped_intents, &scoped_entries);
        let ledger_chain_matches = match_ledger_to_chain(&scoped_entries, &scoped_events);
        let intent_chain_matches = match_intents_to_chain(&scoped_intents, &scoped_events);

        let statuses = intent_ledger_matches
            .iter()
            .map(|m| m.status)
            .chain(ledger_chain_matches.iter().map(|m| m.status))
            .chain(intent_chain_matches.iter().map(|m| m.status));
        let mut matched = 0u64;
        let mut mismatch = 0u64;
        let mut missing = 0u64;
        for status in statuses {
            match status {
                MatchStatus::Matched => matched += 1,
                MatchStatus::AmountMismatch => mismatch += 1,
                status if status.is_missing() => missing += 1,
                _ => {}
            }
        }
        let discrepancies: Vec<String> = intent_ledger_matches
            .iter()
            .flat_map(|m| m.discrepancies.iter().cloned())
            .chain(
                ledger_chain_matches
                    .iter()
                    .flat_map(|m| m.discrepancies.iter().cloned()),
            )
            .chain(
                intent_chain_matches
                    .iter()
                    .flat_map(|m| m.discrepancies.iter().cloned()),
            )
            .collect();

        let summary = ReconciliationSummary {
            total_intents: scoped_intents.len() as u64,
            total_ledger_entries: scoped_entries.len() as u64,
            total_chain_events: scoped_events.len() as u64,
            matched,
            mismatch,
            missing,
            all_reconciled: mismatch == 0 && missing == 0,
            discrepancies,
        };

        let id = options.report_id.unwrap_or_else(|| {
            format!(
                "recon:{}:{}",
                epoch_millis(self.clock.now()),
                self.counter.fetch_add(1, Ordering::SeqCst)
            )
        });
        let timestamp = options
            .timestamp
            .unwrap_or_else(|| self.clock.now_rfc3339());

        tracing::info!(
            "[at-04] {} reconciled: {} matched, {} mismatched, {} missing",
            id,
            summary.matched,
            summary.mismatch,
            summary.missing
        );

        ReconciliationReport {
            id,
            scope,
            timestamp,
            intent_ledger_matches,
            ledger_chain_matches,
            intent_chain_matches,
            summary,
        }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

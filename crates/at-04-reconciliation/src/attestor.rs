//! # Attestor
//!
//! Wraps a finished reconciliation report into an attestation record whose
//! report hash makes the report content-addressed, and optionally registers
//! the attestation as a registrar state (`attestation:{attestorId}`) that
//! self-transitions on repeat attestations.

use crate::errors::ReconciliationError;
use crate::report::{ReconciliationReport, ReconciliationSummary};
use at_03_registrum::{RegisterOutcome, RegisteredState, Registrum, Transition};
use serde::{Deserialize, Serialize};
use shared_crypto::{hash_canonical_of, to_canonical_value};
use shared_types::{Clock, SystemClock};
use std::sync::Arc;
use uuid::Uuid;

/// A signed-off reconciliation outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRecord {
    /// Record id.
    pub id: String,
    /// The report this record attests.
    pub reconciliation_id: String,
    /// Whether the report came back clean.
    pub all_reconciled: bool,
    /// The report's summary, verbatim.
    pub summary: ReconciliationSummary,
    /// Attesting principal.
    pub attested_by: String,
    /// RFC 3339 attestation instant.
    pub attested_at: String,
    /// SHA-256 of the canonical form of the full report.
    pub report_hash: String,
}

/// Produces attestation records under a fixed attestor identity.
pub struct Attestor {
    id: String,
    clock: Arc<dyn Clock>,
}

impl Attestor {
    /// Create an attestor with the system clock.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_clock(id, Arc::new(SystemClock))
    }

    /// Create an attestor with an explicit clock.
    pub fn with_clock(id: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            id: id.into(),
            clock,
        }
    }

    /// Attestor identity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attest a report. The record id is generated unless overridden.
    pub fn attest(
        &self,
        report: &ReconciliationReport,
        record_id: Option<String>,
    ) -> Result<AttestationRecord, ReconciliationError> {
        let report_hash = hash_canonical_of(report)?;
        Ok(AttestationRecord {
            id: record_id.unwrap_or_else(|| format!("att:{}", Uuid::new_v4())),
            reconciliation_id: report.id.clone(),
            all_reconciled: report.summary.all_reconciled,
            summary: report.summary.clone(),
            attested_by: self.id.clone(),
            attested_at: self.clock.now_rfc3339(),
            report_hash,
        })
    }

    /// Register the attestation as a registrar state.
    ///
    /// The first attestation declares the root `attestation:{attestorId}`;
    /// repeats self-transition, preserving lineage.
    pub fn register(
        &self,
        registrum: &mut Registrum,
        record: &AttestationRecord,
    ) -> Result<RegisterOutcome, ReconciliationError> {
        let state_id = format!("attestation:{}", self.id);
        let data = to_canonical_value(record)?;
        let transition = if registrum.get(&state_id).is_some() {
            Transition::self_update(RegisteredState::root(state_id, data))
        } else {
            Transition::declare_root(RegisteredState::root(state_id, data))
        };
        Ok(registrum.register(transition))
    }
}

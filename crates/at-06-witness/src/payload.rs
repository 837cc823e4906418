//! # Witness Payloads
//!
//! The content-addressed object that gets anchored. The payload hash
//! covers `{source, summary, timestamp}` in canonical form, so a decoded
//! payload can be verified without any out-of-band context.

use crate::errors::WitnessError;
use at_04_reconciliation::{AttestationRecord, ReconciliationReport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_crypto::hash_canonical_of;
use shared_types::Clock;

/// What the anchored digest refers to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PayloadSource {
    /// A reconciliation report.
    #[serde(rename_all = "camelCase")]
    Reconciliation {
        /// The attested report.
        report_id: String,
        /// SHA-256 of the canonical report.
        report_hash: String,
    },
    /// A registrar state.
    #[serde(rename_all = "camelCase")]
    Registrum {
        /// The attested state.
        state_id: String,
        /// Order index of the attested transition.
        order_index: u64,
    },
}

/// A witnessable, content-addressed payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessPayload {
    /// SHA-256 over `{source, summary, timestamp}` canonical.
    pub hash: String,
    /// RFC 3339 build instant.
    pub timestamp: String,
    /// What the digest refers to.
    pub source: PayloadSource,
    /// Compact human-auditable summary.
    pub summary: Value,
}

/// The exact shape the payload hash covers.
#[derive(Serialize)]
struct PayloadContent<'a> {
    source: &'a PayloadSource,
    summary: &'a Value,
    timestamp: &'a str,
}

fn content_hash(
    source: &PayloadSource,
    summary: &Value,
    timestamp: &str,
) -> Result<String, WitnessError> {
    Ok(hash_canonical_of(&PayloadContent {
        source,
        summary,
        timestamp,
    })?)
}

/// Build the payload anchoring a reconciliation outcome.
pub fn build_reconciliation_payload(
    report: &ReconciliationReport,
    attestation: &AttestationRecord,
    clock: &dyn Clock,
) -> Result<WitnessPayload, WitnessError> {
    let source = PayloadSource::Reconciliation {
        report_id: report.id.clone(),
        report_hash: attestation.report_hash.clone(),
    };
    let summary = json!({
        "clean": report.summary.all_reconciled,
        "matched": report.summary.matched,
        "mismatch": report.summary.mismatch,
        "missing": report.summary.missing,
        "attestedBy": attestation.attested_by,
    });
    let timestamp = clock.now_rfc3339();
    let hash = content_hash(&source, &summary, &timestamp)?;
    Ok(WitnessPayload {
        hash,
        timestamp,
        source,
        summary,
    })
}

/// Build the payload anchoring a registrar state.
pub fn build_registrum_payload(
    state_id: &str,
    order_index: u64,
    attested_by: &str,
    summary: Option<Value>,
    clock: &dyn Clock,
) -> Result<WitnessPayload, WitnessError> {
    let source = PayloadSource::Registrum {
        state_id: state_id.to_string(),
        order_index,
    };
    let mut summary = summary.unwrap_or_else(|| json!({}));
    if let Some(map) = summary.as_object_mut() {
        map.insert("attestedBy".to_string(), json!(attested_by));
    }
    let timestamp = clock.now_rfc3339();
    let hash = content_hash(&source, &summary, &timestamp)?;
    Ok(WitnessPayload {
        hash,
        timestamp,
        source,
        summary,
    })
}

/// Recompute the payload hash and compare.
pub fn verify_payload_hash(payload: &WitnessPayload) -> bool {
    content_hash(&payload.source, &payload.summary, &payload.timestamp)
        .map(|recomputed| recomputed == payload.hash)
        .unwrap_or(false)
}

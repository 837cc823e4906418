//! # Bundle Replay
//!
//! The zero-trust verification path: recompute every digest from the
//! snapshots the bundle itself carries and compare against the declared
//! values. PASS requires every recomputation to match.

use crate::bundle::{compute_subsystems, covering_hash, StateBundle};
use crate::errors::BundleError;
use serde::{Deserialize, Serialize};

/// Outcome of replaying a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayResult {
    /// True iff every recomputed digest matched its declared value.
    pub pass: bool,
    /// Every mismatch found, in check order. Never silently dropped.
    pub discrepancies: Vec<String>,
}

/// Recompute and compare every digest a bundle declares.
///
/// Idempotent and side-effect-free; safe to run repeatedly on the same
/// bundle.
pub fn replay_bundle(bundle: &StateBundle) -> Result<ReplayResult, BundleError> {
    let mut discrepancies = Vec::new();

    let (subsystems, combined) = compute_subsystems(
        &bundle.ledger_snapshot,
        &bundle.registrum_snapshot,
        bundle.chain_hashes.as_ref(),
    )?;

    if subsystems.ledger != bundle.global_state_hash.subsystems.ledger {
        discrepancies.push(format!(
            "ledger hash mismatch: recomputed {}, declared {}",
            subsystems.ledger, bundle.global_state_hash.subsystems.ledger
        ));
    }
    if subsystems.registrum != bundle.global_state_hash.subsystems.registrum {
        discrepancies.push(format!(
            "registrum hash mismatch: recomputed {}, declared {}",
            subsystems.registrum, bundle.global_state_hash.subsystems.registrum
        ));
    }
    if subsystems.chains != bundle.global_state_hash.subsystems.chains {
        discrepancies.push("chain hash set does not match declared subsystems".to_string());
    }
    if combined != bundle.global_state_hash.hash {
        discrepancies.push(format!(
            "global state hash mismatch: recomputed {}, declared {}",
            combined, bundle.global_state_hash.hash
        ));
    }

    let recomputed_bundle_hash = covering_hash(bundle)?;
    if recomputed_bundle_hash != bundle.bundle_hash {
        discrepancies.push(format!(
            "bundle hash mismatch: recomputed {}, declared {}",
            recomputed_bundle_hash, bundle.bundle_hash
        ));
    }

    Ok(ReplayResult {
        pass: discrepancies.is_empty(),
        discrepancies,
    })
}

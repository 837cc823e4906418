//! # Bundle Assembly
//!
//! Builds the exportable bundle. Every digest is computed from a fixed
//! canonical shape so external replays agree byte-for-byte.

use crate::errors::BundleError;
use at_03_registrum::RegistrumSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_crypto::{hash_canonical, hash_canonical_of, to_canonical_value};
use shared_types::Clock;
use std::collections::BTreeMap;

/// Bundle schema version.
pub const BUNDLE_VERSION: u32 = 1;

/// Per-subsystem digests inside the global state hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemHashes {
    /// Digest of the ledger snapshot.
    pub ledger: String,
    /// Digest of the registrum snapshot.
    pub registrum: String,
    /// Per-chain digests, keyed by chain id.
    pub chains: BTreeMap<String, String>,
}

/// The combined digest over every subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStateHash {
    /// `SHA-256(canonical(subsystems))`
    pub hash: String,
    /// RFC 3339 computation instant.
    pub computed_at: String,
    /// The per-subsystem digests the hash covers.
    pub subsystems: SubsystemHashes,
}

/// The exportable state bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBundle {
    /// Schema version (always 1).
    pub version: u32,
    /// Opaque ledger snapshot (the ledger subsystem is external).
    pub ledger_snapshot: Value,
    /// Full registrar snapshot.
    pub registrum_snapshot: RegistrumSnapshot,
    /// Combined digest over every subsystem.
    pub global_state_hash: GlobalStateHash,
    /// Self hashes of the events backing this state, in global order.
    pub event_hashes: Vec<String>,
    /// Per-chain fold digests, when chains were audited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_hashes: Option<BTreeMap<String, String>>,
    /// RFC 3339 export instant.
    pub exported_at: String,
    /// SHA-256 over the canonical form of every other field.
    pub bundle_hash: String,
}

/// Inputs to [`export_bundle`].
#[derive(Clone, Debug)]
pub struct BundleInput {
    /// Opaque ledger snapshot.
    pub ledger_snapshot: Value,
    /// Registrar snapshot.
    pub registrum_snapshot: RegistrumSnapshot,
    /// Self hashes of the backing events, in global order.
    pub event_hashes: Vec<String>,
    /// Per-chain fold digests from the multi-chain replay audit.
    pub chain_hashes: Option<BTreeMap<String, String>>,
}

/// Hash of a bundle with its own `bundleHash` field removed.
pub(crate) fn covering_hash(bundle: &StateBundle) -> Result<String, BundleError> {
    let mut value = to_canonical_value(bundle)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("bundleHash");
    }
    Ok(hash_canonical(&value)?)
}

/// Recompute the subsystem digests and the combined hash over them.
pub(crate) fn compute_subsystems(
    ledger_snapshot: &Value,
    registrum_snapshot: &RegistrumSnapshot,
    chain_hashes: Option<&BTreeMap<String, String>>,
) -> Result<(SubsystemHashes, String), BundleError> {
    let subsystems = SubsystemHashes {
        ledger: hash_canonical(ledger_snapshot)?,
        registrum: hash_canonical_of(registrum_snapshot)?,
        chains: chain_hashes.cloned().unwrap_or_default(),
    };
    let combined = hash_canonical_of(&subsystems)?;
    Ok((subsystems, combined))
}

/// Assemble and hash an exportable bundle.
pub fn export_bundle(input: BundleInput, clock: &dyn Clock) -> Result<StateBundle, BundleError> {
    let (subsystems, combined) = compute_subsystems(
        &input.ledger_snapshot,
        &input.registrum_snapshot,
        input.chain_hashes.as_ref(),
    )?;
    let now = clock.now_rfc3339();
    let mut bundle = StateBundle {
        version: BUNDLE_VERSION,
        ledger_snapshot: input.ledger_snapshot,
        registrum_snapshot: input.registrum_snapshot,
        global_state_hash: GlobalStateHash {
            hash: combined,
            computed_at: now.clone(),
            subsystems,
        },
        event_hashes: input.event_hashes,
        chain_hashes: input.chain_hashes,
        exported_at: now,
        bundle_hash: String::new(),
    };
    bundle.bundle_hash = covering_hash(&bundle)?;
    tracing::info!(
        "[at-07] exported bundle {} covering {} event(s)",
        bundle.bundle_hash,
        bundle.event_hashes.len()
    );
    Ok(bundle)
}

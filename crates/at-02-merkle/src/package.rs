//! # Attestation Proof Packages
//!
//! A package bundles an attestation with its content hash, the Merkle root
//! it was committed under, and the inclusion proof for its event digest:
//! everything an external verifier needs, with a covering hash over the
//! whole bundle so any tampering is detectable.

use crate::proof::MerkleProof;
use crate::tree::MerkleTree;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_crypto::{hash_canonical, to_canonical_value};
use shared_types::Clock;

/// Package schema version.
pub const PACKAGE_VERSION: u32 = 1;

/// Self-contained, JSON-portable attestation evidence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationProofPackage {
    /// Schema version (always 1).
    pub version: u32,
    /// The attested claim, verbatim.
    pub attestation: Value,
    /// SHA-256 of the canonical form of `attestation`.
    pub attestation_hash: String,
    /// Root of the tree the attestation's event digest was committed under.
    pub merkle_root: String,
    /// Inclusion proof for the event digest.
    pub inclusion_proof: MerkleProof,
    /// RFC 3339 packaging instant.
    pub packaged_at: String,
    /// SHA-256 over the canonical form of every other field.
    pub package_hash: String,
}

/// Hash of a package with its own `packageHash` field removed.
fn covering_hash(package: &AttestationProofPackage) -> Option<String> {
    let mut value = to_canonical_value(package).ok()?;
    value.as_object_mut()?.remove("packageHash");
    hash_canonical(&value).ok()
}

/// Assemble a proof package.
///
/// Requires a non-empty `tree` actually built from `event_hashes` and a
/// defined `event_hashes[index]`; anything else yields `None`.
pub fn package(
    attestation: &Value,
    event_hashes: &[String],
    tree: &MerkleTree,
    index: usize,
    clock: &dyn Clock,
) -> Option<AttestationProofPackage> {
    if event_hashes.is_empty() || index >= event_hashes.len() {
        return None;
    }
    if tree.leaves() != event_hashes {
        return None;
    }
    let merkle_root = tree.root()?.to_string();
    let inclusion_proof = tree.proof(index)?;
    let attestation_hash = hash_canonical(attestation).ok()?;

    let mut package = AttestationProofPackage {
        version: PACKAGE_VERSION,
        attestation: attestation.clone(),
        attestation_hash,
        merkle_root,
        inclusion_proof,
        packaged_at: clock.now_rfc3339(),
        package_hash: String::new(),
    };
    package.package_hash = covering_hash(&package)?;
    Some(package)
}

/// Verify a package: attestation hash, inclusion proof, root agreement,
/// and the covering package hash. Any mismatch is `false`.
pub fn verify_package(package: &AttestationProofPackage) -> bool {
    let attestation_ok = hash_canonical(&package.attestation)
        .map(|h| h == package.attestation_hash)
        .unwrap_or(false);
    let proof_ok = package.inclusion_proof.verify();
    let root_ok = package.merkle_root == package.inclusion_proof.root;
    let package_ok = covering_hash(package)
        .map(|h| h == package.package_hash)
        .unwrap_or(false);
    attestation_ok && proof_ok && root_ok && package_ok
}

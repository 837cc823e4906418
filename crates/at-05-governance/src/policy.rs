//! # Policy Snapshots
//!
//! The externally visible view of governance state: the signer set, the
//! quorum, and the content-derived policy id.

use serde::{Deserialize, Serialize};
use shared_crypto::hash_canonical_of;

/// A member of the signer set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    /// Signing address.
    pub address: String,
    /// Display label.
    pub label: String,
    /// Voting weight (>= 1).
    pub weight: u64,
    /// RFC 3339 instant the signer was added.
    pub added_at: String,
}

/// The active SLA reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaPolicy {
    /// Policy id.
    pub id: String,
    /// Policy name.
    pub name: String,
    /// Policy version (>= 1).
    pub version: u64,
    /// Required attestation count.
    pub target_count: u64,
}

/// Point-in-time policy snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernancePolicy {
    /// Content-derived id: first 16 hex of
    /// `SHA-256(canonical({version, signers, quorum}))` over the sorted
    /// signer addresses.
    pub id: String,
    /// Store version the snapshot reflects.
    pub version: u64,
    /// The signer set, in insertion order.
    pub signers: Vec<Signer>,
    /// Current quorum threshold.
    pub quorum: u64,
    /// RFC 3339 instant of the last accepted mutation.
    pub updated_at: String,
}

/// Shape hashed into the policy id.
#[derive(Serialize)]
struct PolicyIdInput<'a> {
    version: u64,
    signers: Vec<&'a str>,
    quorum: u64,
}

/// Derive the 16-hex policy id from version, sorted addresses, and quorum.
pub(crate) fn derive_policy_id(version: u64, signers: &[Signer], quorum: u64) -> String {
    let mut addresses: Vec<&str> = signers.iter().map(|s| s.address.as_str()).collect();
    addresses.sort_unstable();
    let input = PolicyIdInput {
        version,
        signers: addresses,
        quorum,
    };
    // The canonical form of this struct always exists.
    let digest = hash_canonical_of(&input).expect("policy id input is canonical");
    digest[..16].to_string()
}

/// Outcome of a quorum check against a set of presented addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumCheck {
    /// Whether the recognized weight meets the quorum.
    pub met: bool,
    /// Summed weight of the recognized addresses.
    pub total_weight: u64,
    /// Quorum the weight was compared against.
    pub quorum: u64,
}

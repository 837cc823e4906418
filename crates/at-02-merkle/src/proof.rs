//! # Inclusion Proofs
//!
//! Self-contained Merkle path verification. A proof carries everything a
//! verifier needs; the tree that produced it is never consulted.

use serde::{Deserialize, Serialize};
use shared_crypto::sha256_hex;

/// Which side of the running hash a sibling sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingDirection {
    /// Sibling is the left child; it prepends to the running hash.
    Left,
    /// Sibling is the right child; it appends to the running hash.
    Right,
}

/// One layer of the Merkle path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest at this layer.
    pub hash: String,
    /// Side the sibling occupies.
    pub direction: SiblingDirection,
}

/// A self-contained inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// The leaf digest being proven.
    pub leaf_hash: String,
    /// Zero-based index of the leaf.
    pub leaf_index: u64,
    /// Path from the leaf layer to just below the root.
    pub siblings: Vec<ProofStep>,
    /// Declared root the path must fold to.
    pub root: String,
}

impl MerkleProof {
    /// Fold the path and compare against the declared root.
    ///
    /// A single-leaf proof has no siblings; the leaf must equal the root.
    pub fn verify(&self) -> bool {
        let mut running = self.leaf_hash.clone();
        for step in &self.siblings {
            let joined = match step.direction {
                SiblingDirection::Right => format!("{}{}", running, step.hash),
                SiblingDirection::Left => format!("{}{}", step.hash, running),
            };
            running = sha256_hex(joined.as_bytes());
        }
        running == self.root
    }
}

//! # Merkle Tree
//!
//! Construction and proof generation. The tree keeps every layer so proof
//! generation is an index walk, not a recomputation.

use crate::proof::{MerkleProof, ProofStep, SiblingDirection};
use shared_crypto::sha256_hex;

/// Binary Merkle tree over an ordered sequence of leaf digests.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// `layers[0]` is the leaves; the last layer holds the single root.
    layers: Vec<Vec<String>>,
}

/// Hash two child digests into their parent node.
fn node_hash(left: &str, right: &str) -> String {
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    sha256_hex(joined.as_bytes())
}

impl MerkleTree {
    /// Build a tree from leaf digests (lowercase hex strings).
    ///
    /// Odd nodes pair with themselves; an empty leaf set yields a rootless
    /// tree.
    pub fn build(leaves: Vec<String>) -> Self {
        let mut layers = vec![leaves];
        while layers.last().map(|layer| layer.len() > 1).unwrap_or(false) {
            let current = layers.last().expect("layer exists");
            let mut next = Vec::with_capacity((current.len() + 1) / 2);
            for pair in current.chunks(2) {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                next.push(node_hash(left, right));
            }
            layers.push(next);
        }
        Self { layers }
    }

    /// Root digest; `None` for an empty tree.
    pub fn root(&self) -> Option<&str> {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .map(String::as_str)
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.layers.first().map(Vec::len).unwrap_or(0)
    }

    /// The leaf layer.
    pub fn leaves(&self) -> &[String] {
        self.layers.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Generate the inclusion proof for the leaf at `index`.
    ///
    /// Returns `None` for an empty tree or an out-of-range index. The
    /// proof is self-contained: verification never consults the tree.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaf_count() {
            return None;
        }
        let root = self.root()?.to_string();
        let leaf_hash = self.leaves()[index].clone();

        let mut siblings = Vec::new();
        let mut position = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let (sibling_index, direction) = if position % 2 == 0 {
                (position + 1, SiblingDirection::Right)
            } else {
                (position - 1, SiblingDirection::Left)
            };
            // An unpaired tail node duplicates itself.
            let sibling = layer.get(sibling_index).unwrap_or(&layer[position]);
            siblings.push(ProofStep {
                hash: sibling.clone(),
                direction,
            });
            position /= 2;
        }

        Some(MerkleProof {
            leaf_hash,
            leaf_index: index as u64,
            siblings,
            root,
        })
    }
}

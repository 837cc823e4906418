//! # Multi-Chain Replay Audit
//!
//! Per-chain hash-chain folds. Events on one chain fold in
//! (sequenceIndex, then timestamp) order from a chain-specific genesis;
//! the per-chain digests combine, chainId-sorted, into one auditable
//! hash.

use serde::{Deserialize, Serialize};
use shared_crypto::{hash_canonical, sha256_hex};
use shared_types::ChainRef;
use std::collections::BTreeMap;

/// One auditable observation on a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAuditEvent {
    /// Observer-assigned sequence index; primary sort key.
    pub sequence_index: u64,
    /// RFC 3339 observation instant; tie-break sort key.
    pub timestamp: String,
    /// Content digest of the observed event.
    pub event_hash: String,
}

/// Outcome of a multi-chain replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReplayAudit {
    /// Fold digest per chain id.
    pub chain_hashes: BTreeMap<String, String>,
    /// Hash over the chainId-sorted concatenation of the fold digests.
    pub combined_hash: String,
    /// Comparison against the caller's expected combined hash, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_expected: Option<bool>,
}

/// The chain-specific genesis link a fold starts from.
pub fn chain_genesis(chain_id: &ChainRef) -> String {
    // Hashing a fixed canonical shape keeps genesis reproducible from the
    // chain id alone.
    hash_canonical(&serde_json::json!({"chainGenesis": chain_id.to_string()}))
        .expect("chain genesis shape is canonical")
}

/// Fold one chain's events into its chain digest.
fn fold_chain(chain_id: &ChainRef, events: &[ChainAuditEvent]) -> String {
    let mut ordered: Vec<&ChainAuditEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        a.sequence_index
            .cmp(&b.sequence_index)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    let mut running = chain_genesis(chain_id);
    for event in ordered {
        let mut joined = String::with_capacity(running.len() + event.event_hash.len());
        joined.push_str(&running);
        joined.push_str(&event.event_hash);
        running = sha256_hex(joined.as_bytes());
    }
    running
}

/// Replay every chain and combine the digests.
pub fn replay_chains(
    events_by_chain: &BTreeMap<ChainRef, Vec<ChainAuditEvent>>,
    expected_combined: Option<&str>,
) -> ChainReplayAudit {
    let mut chain_hashes = BTreeMap::new();
    for (chain_id, events) in events_by_chain {
        chain_hashes.insert(chain_id.to_string(), fold_chain(chain_id, events));
    }

    // BTreeMap iteration is chainId-sorted, which is the combination
    // order verifiers must reproduce.
    let concatenated: String = chain_hashes.values().cloned().collect();
    let combined_hash = sha256_hex(concatenated.as_bytes());

    ChainReplayAudit {
        matches_expected: expected_combined.map(|expected| expected == combined_hash),
        chain_hashes,
        combined_hash,
    }
}

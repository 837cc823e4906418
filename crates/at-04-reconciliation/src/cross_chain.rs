//! # Cross-Chain Rules
//!
//! Rollup settlement awareness. An L2 transfer that settles on Ethereum
//! mainnet shows up twice when both chains are observed; these rules
//! deduplicate the L1 artifact before reconciliation and link related
//! events across chains for audit trails.

use crate::amounts::{amounts_equal, parse_raw};
use serde::{Deserialize, Serialize};
use shared_types::{ChainEvent, ChainRef};

/// L2 → L1 settlement table: Arbitrum, Optimism, and Base settle on
/// Ethereum mainnet.
const SETTLEMENT_TABLE: &[(&str, &str)] = &[
    ("eip155:42161", "eip155:1"),
    ("eip155:10", "eip155:1"),
    ("eip155:8453", "eip155:1"),
];

/// The chain a given L2 settles on, if it is a known rollup.
pub fn settles_on(chain: &ChainRef) -> Option<ChainRef> {
    let key = chain.to_string();
    SETTLEMENT_TABLE
        .iter()
        .find(|(l2, _)| *l2 == key)
        .and_then(|(_, l1)| ChainRef::parse(l1).ok())
}

/// Whether one of the two chains settles on the other.
pub fn is_settlement_pair(a: &ChainRef, b: &ChainRef) -> bool {
    settles_on(a).as_ref() == Some(b) || settles_on(b).as_ref() == Some(a)
}

/// Outcome of [`prevent_double_counting`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DedupResult {
    /// Events to reconcile against.
    pub kept: Vec<ChainEvent>,
    /// L1 settlement artifacts that were dropped.
    pub removed: Vec<ChainEvent>,
}

/// Drop L1 artifacts of L2 transfers before reconciliation.
///
/// Events are grouped by (amount, symbol, sorted endpoints); when a group
/// spans a settlement pair, the L2 event survives and the L1 copy is
/// removed. Groups without a settlement pair keep everything.
pub fn prevent_double_counting(events: &[ChainEvent]) -> DedupResult {
    let group_key = |event: &ChainEvent| -> (String, String, String, String) {
        let mut endpoints = [event.from.clone(), event.to.clone()];
        endpoints.sort();
        let [low, high] = endpoints;
        (event.amount.clone(), event.symbol.clone(), low, high)
    };

    let mut kept = Vec::new();
    let mut removed = Vec::new();

    for event in events {
        let key = group_key(event);
        let is_l1_artifact = events.iter().any(|other| {
            group_key(other) == key
                && other.chain_id != event.chain_id
                && settles_on(&other.chain_id).as_ref() == Some(&event.chain_id)
        });
        if is_l1_artifact {
            tracing::debug!(
                "[at-04] dropping L1 settlement artifact tx {} on {}",
                event.tx_hash,
                event.chain_id
            );
            removed.push(event.clone());
        } else {
            kept.push(event.clone());
        }
    }

    DedupResult { kept, removed }
}

/// How two linked events relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// The chains form a known settlement pair.
    Settlement,
    /// Structurally similar events on unrelated chains.
    Structural,
}

/// How many of the three similarity criteria held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkConfidence {
    /// All three criteria matched.
    High,
    /// Exactly two criteria matched.
    Medium,
}

/// One side of a cross-chain link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventKey {
    /// Chain the event was observed on.
    pub chain_id: ChainRef,
    /// Transaction hash.
    pub tx_hash: String,
}

impl EventKey {
    fn of(event: &ChainEvent) -> Self {
        Self {
            chain_id: event.chain_id.clone(),
            tx_hash: event.tx_hash.clone(),
        }
    }
}

/// A structural link between two events on different chains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainLink {
    /// First event.
    pub left: EventKey,
    /// Second event.
    pub right: EventKey,
    /// Relationship kind.
    pub link_type: LinkType,
    /// Similarity confidence.
    pub confidence: LinkConfidence,
}

/// Link events across chains when at least two of (amount, symbol,
/// address-overlap) match.
pub fn link_cross_chain_events(events: &[ChainEvent]) -> Vec<CrossChainLink> {
    let mut links = Vec::new();
    for (i, left) in events.iter().enumerate() {
        for right in events.iter().skip(i + 1) {
            if left.chain_id == right.chain_id {
                continue;
            }
            let amount_matches = match (parse_raw(&left.amount), parse_raw(&right.amount)) {
                (Ok(a), Ok(b)) => {
                    amounts_equal(a, left.decimals, b, right.decimals).unwrap_or(false)
                }
                _ => false,
            };
            let symbol_matches = left.symbol == right.symbol;
            let addresses_overlap = left.from == right.from
                || left.from == right.to
                || left.to == right.from
                || left.to == right.to;

            let matched = [amount_matches, symbol_matches, addresses_overlap]
                .iter()
                .filter(|&&m| m)
                .count();
            if matched < 2 {
                continue;
            }

            links.push(CrossChainLink {
                left: EventKey::of(left),
                right: EventKey::of(right),
                link_type: if is_settlement_pair(&left.chain_id, &right.chain_id) {
                    LinkType::Settlement
                } else {
                    LinkType::Structural
                },
                confidence: if matched == 3 {
                    LinkConfidence::High
                } else {
                    LinkConfidence::Medium
                },
            });
        }
    }
    links
}

//! # Hash Chain
//!
//! Chain-link computation over stored events. Each event's selfHash covers
//! its predecessor's hash, its placement, and the full event, so removing,
//! reordering, or editing any event breaks every later link.

use crate::domain::errors::EventStoreError;
use serde::Serialize;
use shared_crypto::hash_canonical_of;
use shared_types::Event;

/// The exact shape that is canonicalized and hashed for a chain link.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainLinkInput<'a> {
    prev_hash: &'a str,
    stream_id: &'a str,
    version: u64,
    global_position: u64,
    event: &'a Event,
}

/// Compute `selfHash = SHA-256(canonical({prevHash, streamId, version,
/// globalPosition, event}))`.
pub fn compute_self_hash(
    prev_hash: &str,
    stream_id: &str,
    version: u64,
    global_position: u64,
    event: &Event,
) -> Result<String, EventStoreError> {
    let input = ChainLinkInput {
        prev_hash,
        stream_id,
        version,
        global_position,
        event,
    };
    Ok(hash_canonical_of(&input)?)
}

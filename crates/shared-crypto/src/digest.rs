//! # SHA-256 Digests
//!
//! Content addressing over canonical bytes. Digests are always rendered as
//! 64 lowercase hex characters so they can travel through JSON unchanged.

use crate::canonical::{canonical_json_bytes, to_canonical_value};
use crate::errors::CanonicalError;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Length of a rendered SHA-256 digest in hex characters.
pub const HEX_DIGEST_LEN: usize = 64;

/// The all-zeros chain link that precedes the first event of a log.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// SHA-256 of raw bytes, rendered as lowercase hex.
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_ref());
    hex::encode(hasher.finalize())
}

/// SHA-256 over the canonical JSON form of a value.
pub fn hash_canonical(value: &Value) -> Result<String, CanonicalError> {
    Ok(sha256_hex(canonical_json_bytes(value)?))
}

/// SHA-256 over the canonical JSON form of any serializable value.
pub fn hash_canonical_of<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    hash_canonical(&to_canonical_value(value)?)
}

//! # Shared Crypto Crate
//!
//! Deterministic serialization and content-address digests. Every hash in
//! Attestia (event chain links, snapshot hashes, Merkle leaves, attestation
//! packages, witness payloads) is computed over the canonical JSON form
//! produced here, so two processes that agree on a logical value agree on
//! its digest.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all digest inputs flow through
//!   [`canonical_json_bytes`]; nothing else serializes for hashing.
//! - **Fail Closed**: values that have no canonical form (non-finite
//!   numbers) are rejected with a typed error, never coerced.
//! - **Stable Across Processes**: object members are sorted by Unicode
//!   codepoint, whitespace-free, with minimal string escapes (RFC 8785).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod digest;
pub mod errors;

pub use canonical::{
    canonical_json_bytes, canonical_json_string, canonicalize_value, number_from_f64,
    to_canonical_value,
};
pub use digest::{hash_canonical, hash_canonical_of, sha256_hex, GENESIS_HASH, HEX_DIGEST_LEN};
pub use errors::CanonicalError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}

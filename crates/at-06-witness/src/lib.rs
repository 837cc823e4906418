//! # Witness Pipeline (at-06)
//!
//! Anchors a content-addressed payload digest on a public ledger so any
//! third party can verify that a reconciliation or registry state existed
//! at a point in time. The pipeline builds the payload, encodes it into a
//! wire memo, submits a 1-unit self-send carrying the memo (single-signer
//! with retry, or N-of-M multi-sign under a governance quorum), and
//! verifies by reading the transaction back.
//!
//! ## Pipeline
//!
//! ```text
//! report/registry ─→ payload ─→ memo ─→ sign ─→ submit ─→ readback
//!                      │                 │                    │
//!                   hash over        quorum check         decode +
//!                 {source,summary,   (multi-sig)        hash compare
//!                   timestamp}
//! ```
//!
//! ## Module Structure
//!
//! - `payload` - Content-addressed witness payloads
//! - `memo` - Wire memo encode/decode (`attestia/witness/v1`)
//! - `retry` - Exponential backoff with jitter and deadlines
//! - `ports/` - Ledger client and signer ports with mock adapters
//! - `submitter` - Single-signer and multi-sig submitters
//! - `verifier` - Readback verification

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod memo;
pub mod payload;
pub mod ports;
pub mod retry;
pub mod submitter;
pub mod verifier;

// Re-exports
pub use errors::{MemoError, WitnessError};
pub use memo::{decode_memo, encode_memo, WitnessMemo, MEMO_FORMAT, MEMO_TYPE};
pub use payload::{
    build_reconciliation_payload, build_registrum_payload, verify_payload_hash, PayloadSource,
    WitnessPayload,
};
pub use ports::outbound::{
    combine_multisig, AnchorLedgerClient, AnchoredTransaction, LedgerClientError, MockAnchorLedger,
    MockSigner, MultisigEntry, PreparedTransaction, SignedBlob, TransactionSigner,
};
pub use retry::{is_non_retryable, retry_with_backoff, RetryError, RetryPolicy};
pub use submitter::{MultiSigSubmitter, SingleSignerSubmitter, WitnessRecord};
pub use verifier::{VerificationResult, WitnessVerifier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

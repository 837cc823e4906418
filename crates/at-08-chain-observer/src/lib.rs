//! # Chain Observer (at-08)
//!
//! The minimum read-only interface the reconciler and state bundle consume
//! for on-chain facts: balances, token balances, and transfer queries.
//! Actual RPC transports live outside the core; this crate fixes the
//! contract every implementation must honor and ships the in-memory
//! implementation tests run against.
//!
//! ## Implementation Contract
//!
//! - Transfers return sorted by block number ascending.
//! - Self-transfers are deduplicated by txHash across direction unions.
//! - `limit` caps results after sorting.
//! - Chain state is never modified.
//!
//! Chain ids follow the CAIP-2-like scheme of `shared-types`
//! (`eip155:*`, `xrpl:*`, `solana:*`).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod observer;
pub mod types;

// Re-exports
pub use errors::ObserverError;
pub use observer::{ChainObserver, InMemoryChainObserver};
pub use types::{ObservedTransfer, TransferDirection, TransferQuery};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

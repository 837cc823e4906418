//! # Governance Store (at-05)
//!
//! An event-sourced N-of-M signer set with a weight-bounded quorum
//! threshold. Every accepted mutation appends a lifecycle event and bumps
//! the store version; replaying the event history reconstructs a
//! byte-indistinguishable store, because all mutations flow through one
//! apply function.
//!
//! ## State Machine
//!
//! - A signer address is either absent or present.
//! - Quorum is an integer >= 1, bounded above by the total signer weight
//!   whenever the signer set is non-empty.
//! - Removing a signer may never drop the total weight below the current
//!   quorum.
//!
//! ## Module Structure
//!
//! - `events` - Lifecycle events (`signer_added`, `quorum_changed`, ...)
//! - `store` - The `GovernanceStore` and its apply/replay machinery
//! - `policy` - Policy snapshots and quorum checks
//! - `errors` - Typed rejections

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod events;
pub mod policy;
pub mod store;

// Re-exports
pub use errors::GovernanceError;
pub use events::{GovernanceEvent, GovernanceEventKind};
pub use policy::{GovernancePolicy, QuorumCheck, Signer, SlaPolicy};
pub use store::GovernanceStore;

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

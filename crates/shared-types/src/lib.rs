//! # Shared Types Crate
//!
//! Cross-subsystem domain entities for Attestia. Everything that travels
//! between subsystems (domain events, reconcilable records, chain
//! references, timestamps) is defined here.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: a record shape lives here or nowhere.
//! - **Wire Fidelity**: serde renames pin the exact JSON field names, so
//!   canonical hashing is stable across processes.
//! - **Closed Event Vocabulary**: `event_types` enumerates every known
//!   Attestia event type at compile time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod errors;
pub mod events;
pub mod records;
pub mod timestamps;

pub use chain::ChainRef;
pub use errors::{ChainRefError, IntentTransitionError};
pub use events::{event_types, Event, EventMetadata, EventMetadataBuilder, JsonMap};
pub use records::{ChainEvent, Intent, IntentStatus, LedgerEntry, Money};
pub use timestamps::{
    epoch_millis, format_rfc3339_millis, parse_rfc3339_utc, Clock, FixedClock, SystemClock,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

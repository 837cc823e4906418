//! # Attestia Test Suite
//!
//! Unified test crate for cross-subsystem flows. Per-crate unit tests
//! live next to the code they exercise; everything here spans at least
//! two subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── event_flow.rs              # append, hash chain, concurrency guard
//! ├── proof_flow.rs              # stored events -> Merkle -> proof package
//! ├── reconciliation_flow.rs     # records -> three-way match -> attestation
//! ├── governance_witness_flow.rs # quorum -> multi-sign anchor -> readback
//! └── bundle_flow.rs             # export -> external replay -> consensus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p attestia-tests
//!
//! # By flow
//! cargo test -p attestia-tests integration::event_flow
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;

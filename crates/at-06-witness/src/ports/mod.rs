//! # Ports
//!
//! Outbound SPI traits for the anchoring ledger and transaction signing.

pub mod outbound;

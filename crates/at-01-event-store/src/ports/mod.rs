//! # Ports
//!
//! Inbound API trait and outbound SPI traits for the Event Store.

pub mod inbound;
pub mod outbound;

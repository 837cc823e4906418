//! # Adapters
//!
//! Durable implementations of the outbound ports.

pub mod jsonl;

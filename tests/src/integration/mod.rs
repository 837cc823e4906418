//! # Integration Flows
//!
//! Cross-subsystem choreography tests.

pub mod bundle_flow;
pub mod event_flow;
pub mod governance_witness_flow;
pub mod proof_flow;
pub mod reconciliation_flow;

use shared_types::{Event, EventMetadata, FixedClock};
use std::sync::Arc;

/// The instant every deterministic fixture is pinned to.
pub const FIXED_EPOCH_MILLIS: i64 = 1_749_945_600_000;

/// Clock pinned to 2025-06-15T00:00:00.000Z.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_epoch_millis(FIXED_EPOCH_MILLIS))
}

/// A deterministic domain event for fixtures.
pub fn test_event(event_type: &str, payload: serde_json::Value) -> Event {
    Event::with_payload_value(
        event_type,
        EventMetadata::builder("tests")
            .event_id(format!("evt-{event_type}"))
            .correlation_id("corr-fixture")
            .timestamp("2025-06-15T00:00:00.000Z")
            .build(),
        payload,
    )
}

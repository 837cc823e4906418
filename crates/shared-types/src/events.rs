//! # Domain Events
//!
//! The event triple every subsystem emits: a dotted type, mandatory
//! metadata, and an open-shape payload. Payloads stay as JSON maps so the
//! canonicalizer and hash chain operate on one representation regardless of
//! which typed constructor produced them.

use crate::timestamps::{format_rfc3339_millis, Clock};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Open-shape JSON payload.
pub type JsonMap = serde_json::Map<String, Value>;

/// The closed vocabulary of Attestia event types.
///
/// Event types follow `<subsystem>.<entity>.<action>`. Anything outside
/// this set is still storable (the log is append-only and shape-agnostic),
/// but core subsystems only ever emit these.
pub mod event_types {
    /// Payment intent declared.
    pub const INTENT_DECLARED: &str = "intent.payment.declared";
    /// Payment intent moved to execution.
    pub const INTENT_EXECUTING: &str = "intent.payment.executing";
    /// Payment intent executed.
    pub const INTENT_EXECUTED: &str = "intent.payment.executed";
    /// Payment intent failed.
    pub const INTENT_FAILED: &str = "intent.payment.failed";
    /// Ledger posting recorded.
    pub const LEDGER_POSTING_RECORDED: &str = "ledger.posting.recorded";
    /// On-chain transfer observed.
    pub const CHAIN_TRANSFER_OBSERVED: &str = "chain.transfer.observed";
    /// Reconciliation report completed.
    pub const RECONCILIATION_COMPLETED: &str = "reconciliation.report.completed";
    /// Reconciliation attestation recorded.
    pub const ATTESTATION_RECORDED: &str = "reconciliation.attestation.recorded";
    /// Registrum state registered.
    pub const REGISTRUM_REGISTERED: &str = "registrum.state.registered";
    /// Registrum state updated via self-transition.
    pub const REGISTRUM_UPDATED: &str = "registrum.state.updated";
    /// Governance signer added.
    pub const SIGNER_ADDED: &str = "governance.signer.added";
    /// Governance signer removed.
    pub const SIGNER_REMOVED: &str = "governance.signer.removed";
    /// Governance quorum changed.
    pub const QUORUM_CHANGED: &str = "governance.quorum.changed";
    /// Governance policy rotated.
    pub const POLICY_ROTATED: &str = "governance.policy.rotated";
    /// Governance SLA policy set.
    pub const SLA_POLICY_SET: &str = "governance.sla.policy_set";
    /// Witness anchor submitted.
    pub const WITNESS_SUBMITTED: &str = "witness.anchor.submitted";
    /// Witness anchor verified by readback.
    pub const WITNESS_VERIFIED: &str = "witness.anchor.verified";

    /// Every known event type.
    pub const ALL: &[&str] = &[
        INTENT_DECLARED,
        INTENT_EXECUTING,
        INTENT_EXECUTED,
        INTENT_FAILED,
        LEDGER_POSTING_RECORDED,
        CHAIN_TRANSFER_OBSERVED,
        RECONCILIATION_COMPLETED,
        ATTESTATION_RECORDED,
        REGISTRUM_REGISTERED,
        REGISTRUM_UPDATED,
        SIGNER_ADDED,
        SIGNER_REMOVED,
        QUORUM_CHANGED,
        POLICY_ROTATED,
        SLA_POLICY_SET,
        WITNESS_SUBMITTED,
        WITNESS_VERIFIED,
    ];

    /// Whether the given type belongs to the closed vocabulary.
    pub fn is_known(event_type: &str) -> bool {
        ALL.contains(&event_type)
    }
}

/// Mandatory event metadata.
///
/// Always present on every event: identity, wall-clock instant, acting
/// principal, correlation id, and originating subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Unique event identity.
    pub event_id: String,
    /// RFC 3339 UTC instant.
    pub timestamp: String,
    /// Acting principal.
    pub actor: String,
    /// Correlation id linking related events across streams.
    pub correlation_id: String,
    /// Originating subsystem.
    pub source: String,
}

impl EventMetadata {
    /// Start building metadata for the given source subsystem.
    pub fn builder(source: impl Into<String>) -> EventMetadataBuilder {
        EventMetadataBuilder {
            event_id: None,
            timestamp: None,
            actor: "system".to_string(),
            correlation_id: None,
            source: source.into(),
        }
    }
}

/// Builder for [`EventMetadata`]; unset fields get deterministic-friendly
/// defaults at `build` time.
#[derive(Clone, Debug)]
pub struct EventMetadataBuilder {
    event_id: Option<String>,
    timestamp: Option<String>,
    actor: String,
    correlation_id: Option<String>,
    source: String,
}

impl EventMetadataBuilder {
    /// Override the generated event id.
    pub fn event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    /// Override the timestamp (RFC 3339 UTC).
    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    /// Set the acting principal.
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Set the correlation id.
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Build, stamping the current instant from the given clock.
    pub fn build_with_clock(mut self, clock: &dyn Clock) -> EventMetadata {
        let timestamp = self
            .timestamp
            .take()
            .unwrap_or_else(|| clock.now_rfc3339());
        self.finish(timestamp)
    }

    /// Build, stamping the system clock.
    pub fn build(mut self) -> EventMetadata {
        let timestamp = self
            .timestamp
            .take()
            .unwrap_or_else(|| format_rfc3339_millis(Utc::now()));
        self.finish(timestamp)
    }

    fn finish(self, timestamp: String) -> EventMetadata {
        EventMetadata {
            event_id: self
                .event_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp,
            actor: self.actor,
            correlation_id: self
                .correlation_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            source: self.source,
        }
    }
}

/// A domain event: type, metadata, payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Dotted event type (`<subsystem>.<entity>.<action>`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Mandatory metadata.
    pub metadata: EventMetadata,
    /// Open-shape payload.
    pub payload: JsonMap,
}

impl Event {
    /// Construct an event from its three parts.
    pub fn new(event_type: impl Into<String>, metadata: EventMetadata, payload: JsonMap) -> Self {
        Self {
            event_type: event_type.into(),
            metadata,
            payload,
        }
    }

    /// Construct an event with a payload built from a JSON object literal.
    ///
    /// Non-object payload values are wrapped under a `"value"` key so the
    /// payload is always a map.
    pub fn with_payload_value(
        event_type: impl Into<String>,
        metadata: EventMetadata,
        payload: Value,
    ) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            other => {
                let mut map = JsonMap::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self::new(event_type, metadata, payload)
    }
}

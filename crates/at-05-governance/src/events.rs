//! # Lifecycle Events
//!
//! The governance event log vocabulary. State is derived exclusively by
//! folding these events, which is what makes replay deterministic.

use serde::{Deserialize, Serialize};

/// What a governance event did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEventKind {
    /// A signer joined the set.
    SignerAdded {
        /// Signer address.
        address: String,
        /// Display label.
        label: String,
        /// Voting weight (>= 1).
        weight: u64,
    },
    /// A signer left the set.
    SignerRemoved {
        /// Signer address.
        address: String,
    },
    /// The quorum threshold changed.
    QuorumChanged {
        /// New quorum.
        quorum: u64,
    },
    /// The policy identity was rotated without membership changes.
    PolicyRotated,
    /// The SLA reference was set or replaced.
    SlaPolicySet {
        /// Policy id.
        id: String,
        /// Policy name.
        name: String,
        /// Policy version (>= 1).
        version: u64,
        /// Required attestation count.
        target_count: u64,
    },
}

/// A timestamped entry in the governance event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceEvent {
    /// The mutation.
    #[serde(flatten)]
    pub kind: GovernanceEventKind,
    /// RFC 3339 instant the mutation was accepted.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_snake_case_tags() {
        let event = GovernanceEvent {
            kind: GovernanceEventKind::SignerAdded {
                address: "rA".to_string(),
                label: "ops-1".to_string(),
                weight: 1,
            },
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "signer_added");
        assert_eq!(value["address"], "rA");
        assert_eq!(value["timestamp"], "2025-06-15T00:00:00.000Z");

        let quorum = GovernanceEvent {
            kind: GovernanceEventKind::QuorumChanged { quorum: 2 },
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&quorum).unwrap()["type"],
            "quorum_changed"
        );
    }

    #[test]
    fn test_round_trip() {
        let event = GovernanceEvent {
            kind: GovernanceEventKind::SlaPolicySet {
                id: "sla-1".to_string(),
                name: "daily attestations".to_string(),
                version: 1,
                target_count: 24,
            },
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GovernanceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

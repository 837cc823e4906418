//! # Registrum Service
//!
//! The ordered state registry: accept/reject protocol, lineage, snapshots,
//! and the attested payload other subsystems anchor.

use crate::domain::entities::{AcceptedTransition, RegisteredState, Transition};
use crate::domain::errors::{RegistrumError, Violation, ViolationClass};
use serde::{Deserialize, Serialize};
use shared_crypto::{hash_canonical, hash_canonical_of, to_canonical_value};
use std::collections::BTreeMap;

/// Registrar configuration. The mode label travels inside attestation
/// payloads so verifiers know which enforcement profile produced them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrumConfig {
    /// Enforcement profile label.
    pub mode: String,
}

impl Default for RegistrumConfig {
    fn default() -> Self {
        Self {
            mode: "ordered".to_string(),
        }
    }
}

/// Outcome of [`Registrum::register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Transition accepted at the given order index.
    Accepted {
        /// Index consumed by this transition; dense from 0.
        order_index: u64,
    },
    /// Transition rejected; the registry is unchanged.
    Rejected {
        /// Every violation the transition committed.
        violations: Vec<Violation>,
    },
}

/// Deterministic, hashable registry snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrumSnapshot {
    /// Ordering watermark.
    pub ordering: SnapshotOrdering,
    /// SHA-256 of the canonical form of the state map.
    pub registry_hash: String,
    /// Every registered state, keyed by id.
    pub states: BTreeMap<String, RegisteredState>,
    /// The accepted-transition log in order.
    pub transitions: Vec<AcceptedTransition>,
}

/// Ordering watermark inside a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOrdering {
    /// Count of accepted transitions; the next accept consumes this index.
    pub max_index: u64,
}

/// Attestation payload describing the registry after a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrumAttestation {
    /// Registrar implementation version.
    #[serde(rename = "registrumVersion")]
    pub registrum_version: String,
    /// Hash of the full snapshot at attestation time.
    pub snapshot_hash: String,
    /// Number of distinct registered states.
    pub state_count: u64,
    /// Count of accepted transitions.
    pub ordering_max: u64,
    /// Predecessor declaration of the attested transition.
    #[serde(rename = "transitionFrom")]
    pub transition_from: Option<String>,
    /// Target id of the attested transition.
    #[serde(rename = "transitionTo")]
    pub transition_to: String,
    /// Enforcement profile label.
    pub mode: String,
}

impl RegistrumAttestation {
    /// Content hash of this payload.
    pub fn hash(&self) -> Result<String, RegistrumError> {
        Ok(hash_canonical_of(self)?)
    }
}

/// The structural registrar.
#[derive(Clone, Debug, Default)]
pub struct Registrum {
    config: RegistrumConfig,
    states: BTreeMap<String, RegisteredState>,
    transitions: Vec<AcceptedTransition>,
    lineage: BTreeMap<String, Vec<String>>,
}

impl Registrum {
    /// Create an empty registry.
    pub fn new(config: RegistrumConfig) -> Self {
        Self {
            config,
            states: BTreeMap::new(),
            transitions: Vec::new(),
            lineage: BTreeMap::new(),
        }
    }

    /// Apply a transition under the accept rules.
    ///
    /// Fail-closed: on rejection neither state, lineage, nor the order
    /// index moves.
    pub fn register(&mut self, transition: Transition) -> RegisterOutcome {
        let mut violations = Vec::new();

        if transition.to.id.is_empty() {
            violations.push(Violation::new(
                ViolationClass::EmptyId,
                "state id must be a non-empty string",
            ));
        }

        match &transition.from {
            None => {
                if !transition.to.is_root() {
                    violations.push(Violation::new(
                        ViolationClass::ExplicitLineage,
                        "non-root state requires a parent declaration",
                    ));
                } else if self.states.contains_key(&transition.to.id) {
                    violations.push(Violation::new(
                        ViolationClass::Halt,
                        format!("root {:?} is already registered", transition.to.id),
                    ));
                }
            }
            Some(from_id) => {
                if !self.states.contains_key(from_id) {
                    violations.push(Violation::new(
                        ViolationClass::UnknownParent,
                        format!("declared parent {from_id:?} is not registered"),
                    ));
                } else if from_id != &transition.to.id {
                    violations.push(Violation::new(
                        ViolationClass::ExplicitLineage,
                        format!(
                            "updates must be self-transitions: from {:?}, to {:?}",
                            from_id, transition.to.id
                        ),
                    ));
                }
            }
        }

        if !violations.is_empty() {
            tracing::debug!(
                "[at-03] rejected transition to {:?}: {} violation(s)",
                transition.to.id,
                violations.len()
            );
            return RegisterOutcome::Rejected { violations };
        }

        let order_index = self.transitions.len() as u64;
        let to_id = transition.to.id.clone();
        self.lineage.entry(to_id.clone()).or_default().push(to_id.clone());
        self.states.insert(to_id.clone(), transition.to);
        self.transitions.push(AcceptedTransition {
            order_index,
            from: transition.from,
            to_id,
        });
        RegisterOutcome::Accepted { order_index }
    }

    /// The state currently registered under `id`.
    pub fn get(&self, id: &str) -> Option<&RegisteredState> {
        self.states.get(id)
    }

    /// Ordered sequence of updates observed for `id` (registration
    /// included). Empty when the id is unknown.
    pub fn get_lineage(&self, id: &str) -> Vec<String> {
        self.lineage.get(id).cloned().unwrap_or_default()
    }

    /// Count of accepted transitions.
    pub fn registered_count(&self) -> u64 {
        self.transitions.len() as u64
    }

    /// Count of distinct registered states.
    pub fn state_count(&self) -> u64 {
        self.states.len() as u64
    }

    /// Produce the deterministic snapshot of the whole registry.
    pub fn snapshot(&self) -> Result<RegistrumSnapshot, RegistrumError> {
        let registry_hash = hash_canonical(&to_canonical_value(&self.states)?)?;
        Ok(RegistrumSnapshot {
            ordering: SnapshotOrdering {
                max_index: self.transitions.len() as u64,
            },
            registry_hash,
            states: self.states.clone(),
            transitions: self.transitions.clone(),
        })
    }

    /// Reconstruct a registrar from a snapshot. The restored instance is
    /// behaviorally indistinguishable from the original: the next accept
    /// consumes index `max_index`.
    pub fn from_snapshot(snapshot: RegistrumSnapshot, config: RegistrumConfig) -> Self {
        let mut lineage: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for transition in &snapshot.transitions {
            lineage
                .entry(transition.to_id.clone())
                .or_default()
                .push(transition.to_id.clone());
        }
        Self {
            config,
            states: snapshot.states,
            transitions: snapshot.transitions,
            lineage,
        }
    }

    /// Attested payload describing the registry after the given transition.
    pub fn attestation_payload(
        &self,
        transition_from: Option<&str>,
        transition_to: &str,
    ) -> Result<RegistrumAttestation, RegistrumError> {
        let snapshot = self.snapshot()?;
        let snapshot_hash = hash_canonical(&to_canonical_value(&snapshot)?)?;
        Ok(RegistrumAttestation {
            registrum_version: crate::VERSION.to_string(),
            snapshot_hash,
            state_count: self.state_count(),
            ordering_max: self.registered_count(),
            transition_from: transition_from.map(str::to_string),
            transition_to: transition_to.to_string(),
            mode: self.config.mode.clone(),
        })
    }
}

//! # Governance Store
//!
//! Validate-then-apply event sourcing. Public mutations validate against
//! current state, append a lifecycle event, and fold it through the single
//! `apply` function; `replay_from` resets and refolds, which is why two
//! stores with the same history are indistinguishable.

use crate::errors::GovernanceError;
use crate::events::{GovernanceEvent, GovernanceEventKind};
use crate::policy::{derive_policy_id, GovernancePolicy, QuorumCheck, Signer, SlaPolicy};
use shared_types::{Clock, SystemClock};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Event-sourced signer set + quorum threshold.
pub struct GovernanceStore {
    clock: Arc<dyn Clock>,
    log: Vec<GovernanceEvent>,
    signers: Vec<Signer>,
    quorum: u64,
    version: u64,
    sla: Option<SlaPolicy>,
    updated_at: String,
}

impl GovernanceStore {
    /// Create an empty store with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store with an explicit clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let updated_at = clock.now_rfc3339();
        Self {
            clock,
            log: Vec::new(),
            signers: Vec::new(),
            quorum: 1,
            version: 0,
            sla: None,
            updated_at,
        }
    }

    // -------------------------------------------------------------------------
    // Accepted operations
    // -------------------------------------------------------------------------

    /// Add a signer with the given weight (default 1 at call sites).
    pub fn add_signer(
        &mut self,
        address: &str,
        label: &str,
        weight: u64,
    ) -> Result<(), GovernanceError> {
        if self.find_signer(address).is_some() {
            return Err(GovernanceError::SignerExists {
                address: address.to_string(),
            });
        }
        if weight < 1 {
            return Err(GovernanceError::InvalidWeight { weight });
        }
        self.accept(GovernanceEventKind::SignerAdded {
            address: address.to_string(),
            label: label.to_string(),
            weight,
        });
        Ok(())
    }

    /// Remove a signer, unless the remaining weight would undercut the
    /// quorum.
    pub fn remove_signer(&mut self, address: &str) -> Result<(), GovernanceError> {
        let signer = self
            .find_signer(address)
            .ok_or_else(|| GovernanceError::SignerNotFound {
                address: address.to_string(),
            })?;
        let remaining_weight = self.total_weight() - signer.weight;
        if remaining_weight < self.quorum {
            return Err(GovernanceError::RemovalBreaksQuorum {
                address: address.to_string(),
                remaining_weight,
                quorum: self.quorum,
            });
        }
        self.accept(GovernanceEventKind::SignerRemoved {
            address: address.to_string(),
        });
        Ok(())
    }

    /// Change the quorum threshold within `1..=total_weight`.
    pub fn change_quorum(&mut self, quorum: u64) -> Result<(), GovernanceError> {
        let total_weight = self.total_weight();
        if quorum < 1 || (!self.signers.is_empty() && quorum > total_weight) {
            return Err(GovernanceError::InvalidQuorum {
                requested: quorum,
                total_weight,
            });
        }
        self.accept(GovernanceEventKind::QuorumChanged { quorum });
        Ok(())
    }

    /// Rotate the policy identity without changing membership.
    pub fn rotate_policy(&mut self) {
        self.accept(GovernanceEventKind::PolicyRotated);
    }

    /// Set or replace the SLA reference.
    pub fn set_sla_policy(
        &mut self,
        id: &str,
        name: &str,
        version: u64,
        target_count: u64,
    ) -> Result<(), GovernanceError> {
        if version < 1 {
            return Err(GovernanceError::InvalidSlaPolicy {
                detail: format!("version must be >= 1, got {version}"),
            });
        }
        if target_count < 1 {
            return Err(GovernanceError::InvalidSlaPolicy {
                detail: format!("target count must be >= 1, got {target_count}"),
            });
        }
        self.accept(GovernanceEventKind::SlaPolicySet {
            id: id.to_string(),
            name: name.to_string(),
            version,
            target_count,
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Point-in-time policy snapshot.
    pub fn current_policy(&self) -> GovernancePolicy {
        GovernancePolicy {
            id: derive_policy_id(self.version, &self.signers, self.quorum),
            version: self.version,
            signers: self.signers.clone(),
            quorum: self.quorum,
            updated_at: self.updated_at.clone(),
        }
    }

    /// Sum the weights of the recognized addresses and compare to quorum.
    ///
    /// Duplicate and unrecognized addresses contribute nothing.
    pub fn check_quorum(&self, addresses: &[&str]) -> QuorumCheck {
        let unique: BTreeSet<&str> = addresses.iter().copied().collect();
        let total_weight = unique
            .iter()
            .filter_map(|address| self.find_signer(address))
            .map(|signer| signer.weight)
            .sum();
        QuorumCheck {
            met: total_weight >= self.quorum,
            total_weight,
            quorum: self.quorum,
        }
    }

    /// Compare attestation throughput to the active SLA target.
    ///
    /// No-op when no SLA reference is set.
    pub fn check_sla(&self, attested_count: u64) -> Result<(), GovernanceError> {
        if let Some(sla) = &self.sla {
            if attested_count < sla.target_count {
                return Err(GovernanceError::SlaViolation {
                    policy_id: sla.id.clone(),
                    target: sla.target_count,
                    actual: attested_count,
                });
            }
        }
        Ok(())
    }

    /// The active SLA reference.
    pub fn sla_policy(&self) -> Option<&SlaPolicy> {
        self.sla.as_ref()
    }

    /// Current store version (count of accepted mutations).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current quorum threshold.
    pub fn quorum(&self) -> u64 {
        self.quorum
    }

    /// Total signer weight.
    pub fn total_weight(&self) -> u64 {
        self.signers.iter().map(|s| s.weight).sum()
    }

    /// The full event history.
    pub fn event_history(&self) -> &[GovernanceEvent] {
        &self.log
    }

    // -------------------------------------------------------------------------
    // Replay
    // -------------------------------------------------------------------------

    /// Reset state and reapply the given events.
    ///
    /// Deterministic: all mutations flow through the same apply function,
    /// so a store replayed from `event_history()` is indistinguishable
    /// from the original.
    pub fn replay_from(&mut self, events: Vec<GovernanceEvent>) {
        self.log = Vec::with_capacity(events.len());
        self.signers = Vec::new();
        self.quorum = 1;
        self.version = 0;
        self.sla = None;
        for event in events {
            self.apply(&event);
            self.log.push(event);
        }
        tracing::debug!("[at-05] replayed {} event(s) to v{}", self.log.len(), self.version);
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn find_signer(&self, address: &str) -> Option<&Signer> {
        self.signers.iter().find(|s| s.address == address)
    }

    /// Stamp, apply, and log an accepted mutation.
    fn accept(&mut self, kind: GovernanceEventKind) {
        let event = GovernanceEvent {
            kind,
            timestamp: self.clock.now_rfc3339(),
        };
        self.apply(&event);
        self.log.push(event);
    }

    /// The single state-mutation point, shared by accept and replay.
    fn apply(&mut self, event: &GovernanceEvent) {
        match &event.kind {
            GovernanceEventKind::SignerAdded {
                address,
                label,
                weight,
            } => {
                self.signers.push(Signer {
                    address: address.clone(),
                    label: label.clone(),
                    weight: *weight,
                    added_at: event.timestamp.clone(),
                });
            }
            GovernanceEventKind::SignerRemoved { address } => {
                self.signers.retain(|s| &s.address != address);
            }
            GovernanceEventKind::QuorumChanged { quorum } => {
                self.quorum = *quorum;
            }
            GovernanceEventKind::PolicyRotated => {}
            GovernanceEventKind::SlaPolicySet {
                id,
                name,
                version,
                target_count,
            } => {
                self.sla = Some(SlaPolicy {
                    id: id.clone(),
                    name: name.clone(),
                    version: *version,
                    target_count: *target_count,
                });
            }
        }
        self.version += 1;
        self.updated_at = event.timestamp.clone();
    }
}

impl Default for GovernanceStore {
    fn default() -> Self {
        Self::new()
    }
}

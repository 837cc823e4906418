//! # Bundle Flow
//!
//! The end-to-end trust story: events flow into the store, states into
//! the registrar, everything exports as one bundle, an external party
//! replays it with zero trust in the operator, and verifier reports
//! reduce to a consensus verdict.

#[cfg(test)]
mod tests {
    use crate::integration::{fixed_clock, test_event};
    use at_01_event_store::{
        AppendOptions, EventStore, EventStoreApi, EventStoreConfig, InMemoryEventLog,
        ReadAllOptions,
    };
    use at_03_registrum::{RegisteredState, Registrum, RegistrumConfig, Transition};
    use at_07_state_bundle::{
        aggregate_reports, export_bundle, replay_bundle, replay_chains, BundleInput,
        ChainAuditEvent, ConsensusConfig, StateBundle, SubsystemCheck, Verdict, VerifierReport,
    };
    use serde_json::json;
    use shared_types::ChainRef;
    use std::collections::BTreeMap;

    fn build_bundle() -> StateBundle {
        // Events into the store.
        let store = EventStore::open_with_clock(
            InMemoryEventLog::new(),
            EventStoreConfig::default(),
            fixed_clock(),
        )
        .unwrap();
        for i in 0..3 {
            store
                .append(
                    "payments",
                    vec![test_event("ledger.posting.recorded", json!({"n": i}))],
                    AppendOptions::default(),
                )
                .unwrap();
        }
        assert!(store.verify_integrity().valid);
        let event_hashes: Vec<String> = store
            .read_all(ReadAllOptions::default())
            .unwrap()
            .into_iter()
            .map(|stored| stored.self_hash.expect("hash-chain mode"))
            .collect();

        // States into the registrar.
        let mut registrum = Registrum::new(RegistrumConfig::default());
        registrum.register(Transition::declare_root(RegisteredState::root(
            "vault:v1",
            json!({"balance": "100.00"}),
        )));

        // Chains into the replay audit.
        let chain_events = BTreeMap::from([(
            ChainRef::parse("eip155:1").unwrap(),
            event_hashes
                .iter()
                .enumerate()
                .map(|(i, hash)| ChainAuditEvent {
                    sequence_index: i as u64,
                    timestamp: "2025-06-15T00:00:00.000Z".to_string(),
                    event_hash: hash.clone(),
                })
                .collect::<Vec<_>>(),
        )]);
        let audit = replay_chains(&chain_events, None);

        export_bundle(
            BundleInput {
                ledger_snapshot: json!({"accounts": {"vault:v1": "100.00"}}),
                registrum_snapshot: registrum.snapshot().unwrap(),
                event_hashes,
                chain_hashes: Some(audit.chain_hashes),
            },
            fixed_clock().as_ref(),
        )
        .unwrap()
    }

    /// A fresh bundle replays PASS, even after traveling as JSON.
    #[test]
    fn test_export_then_external_replay() -> anyhow::Result<()> {
        let bundle = build_bundle();

        // The "external party" receives only the JSON.
        let wire = serde_json::to_string(&bundle)?;
        let received: StateBundle = serde_json::from_str(&wire)?;

        let result = replay_bundle(&received)?;
        assert!(result.pass, "discrepancies: {:?}", result.discrepancies);
        Ok(())
    }

    /// Tampering any snapshot inside the bundle is caught on replay.
    #[test]
    fn test_tampered_bundle_fails_replay() {
        let mut bundle = build_bundle();
        bundle.ledger_snapshot["accounts"]["vault:v1"] = json!("999.00");
        let result = replay_bundle(&bundle).unwrap();
        assert!(!result.pass);
        assert!(!result.discrepancies.is_empty());
    }

    /// Independent verifier outcomes reduce to a majority verdict with
    /// dissenters named; an exact tie fails closed.
    #[test]
    fn test_verifier_consensus_over_replays() {
        let bundle = build_bundle();
        let mut tampered = bundle.clone();
        tampered.ledger_snapshot["accounts"]["vault:v1"] = json!("999.00");

        let verify = |verifier: &str, target: &StateBundle| -> VerifierReport {
            let outcome = replay_bundle(target).unwrap();
            VerifierReport {
                report_id: format!("rep-{verifier}"),
                verifier_id: verifier.to_string(),
                verdict: if outcome.pass { Verdict::Pass } else { Verdict::Fail },
                subsystem_checks: vec![SubsystemCheck {
                    subsystem: "bundle".to_string(),
                    passed: outcome.pass,
                    detail: None,
                }],
                discrepancies: outcome.discrepancies,
                bundle_hash: target.bundle_hash.clone(),
                verified_at: "2025-06-15T00:00:00.000Z".to_string(),
            }
        };

        // Two verifiers replay the honest bundle, one was fed the
        // tampered copy.
        let reports = vec![
            verify("v1", &bundle),
            verify("v2", &bundle),
            verify("v3", &tampered),
        ];
        let outcome = aggregate_reports(&reports, &ConsensusConfig::default()).unwrap();
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert!(outcome.quorum_reached);
        assert_eq!(outcome.dissenters, vec!["v3"]);

        // An even split fails closed.
        let split = vec![verify("v1", &bundle), verify("v2", &tampered)];
        let outcome = aggregate_reports(&split, &ConsensusConfig::default()).unwrap();
        assert_eq!(outcome.verdict, Verdict::Fail);
    }

    /// The multi-chain audit is order-insensitive on input but sensitive
    /// to content.
    #[test]
    fn test_chain_audit_round_trip() {
        let chain = ChainRef::parse("eip155:1").unwrap();
        let events = vec![
            ChainAuditEvent {
                sequence_index: 1,
                timestamp: "2025-06-15T00:00:01.000Z".to_string(),
                event_hash: shared_crypto::sha256_hex("first"),
            },
            ChainAuditEvent {
                sequence_index: 0,
                timestamp: "2025-06-15T00:00:00.000Z".to_string(),
                event_hash: shared_crypto::sha256_hex("zeroth"),
            },
        ];
        let shuffled = BTreeMap::from([(chain.clone(), events.clone())]);
        let mut ordered_events = events;
        ordered_events.sort_by_key(|event| event.sequence_index);
        let ordered = BTreeMap::from([(chain, ordered_events)]);

        let a = replay_chains(&shuffled, None);
        let b = replay_chains(&ordered, Some(&a.combined_hash));
        assert_eq!(a.combined_hash, b.combined_hash);
        assert_eq!(b.matches_expected, Some(true));
    }
}

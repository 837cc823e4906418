//! # Event Flow
//!
//! The append-only trust base: dense versions and positions, hash-chain
//! integrity across process restarts, the optimistic-concurrency guard,
//! and snapshot tamper detection.

#[cfg(test)]
mod tests {
    use crate::integration::{fixed_clock, test_event};
    use at_01_event_store::{
        AppendOptions, EventStore, EventStoreApi, EventStoreConfig, InMemorySnapshotStore,
        JsonlEventLog, SnapshotInput, SnapshotStore,
    };
    use serde_json::json;

    /// Scenario: append "a", "b", "c" to stream "s", verify, then corrupt
    /// event 2 on disk and watch integrity collapse.
    #[test]
    fn test_append_verify_corrupt_cycle_on_durable_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        {
            let store = EventStore::open_with_clock(
                JsonlEventLog::open(&path).unwrap(),
                EventStoreConfig::default(),
                fixed_clock(),
            )
            .unwrap();

            let result = store
                .append(
                    "s",
                    vec![
                        test_event("audit.entry.a", json!({"n": 1})),
                        test_event("audit.entry.b", json!({"n": 2})),
                        test_event("audit.entry.c", json!({"n": 3})),
                    ],
                    AppendOptions::default(),
                )
                .unwrap();
            assert_eq!((result.from_version, result.to_version), (1, 3));

            let report = store.verify_integrity();
            assert!(report.valid);
            assert_eq!(report.last_verified_position, 3);
            assert_eq!(report.last_verified_position, store.global_position());
        }

        // Corrupt the payload of event 2 in place.
        let content = std::fs::read_to_string(&path).unwrap();
        let tampered: String = content
            .lines()
            .map(|line| {
                if line.contains("audit.entry.b") {
                    line.replace("\"n\":2", "\"n\":999")
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
            + "\n";
        std::fs::write(&path, tampered).unwrap();

        let store = EventStore::open_with_clock(
            JsonlEventLog::open(&path).unwrap(),
            EventStoreConfig::default(),
            fixed_clock(),
        )
        .unwrap();
        let report = store.verify_integrity();
        assert!(!report.valid);
        assert!(!report.errors.is_empty());
        assert_eq!(report.last_verified_position, 1);
    }

    /// Scenario: the no_stream guard admits exactly one creator.
    #[test]
    fn test_optimistic_concurrency_guard() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open_with_clock(
            JsonlEventLog::open(dir.path().join("events.jsonl")).unwrap(),
            EventStoreConfig::default(),
            fixed_clock(),
        )
        .unwrap();

        store
            .append(
                "s",
                vec![test_event("audit.entry.a", json!({}))],
                AppendOptions::no_stream(),
            )
            .unwrap();

        let conflict = store
            .append(
                "s",
                vec![test_event("audit.entry.b", json!({}))],
                AppendOptions::no_stream(),
            )
            .unwrap_err();
        assert_eq!(conflict.code(), "CONCURRENCY_CONFLICT");

        store
            .append(
                "s",
                vec![test_event("audit.entry.b", json!({}))],
                AppendOptions::exact(1),
            )
            .unwrap();
        assert_eq!(store.stream_version("s"), 2);
    }

    /// Appends into disjoint streams still weave one valid global chain.
    #[test]
    fn test_disjoint_streams_one_chain_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        {
            let store = EventStore::open_with_clock(
                JsonlEventLog::open(&path).unwrap(),
                EventStoreConfig::default(),
                fixed_clock(),
            )
            .unwrap();
            for i in 0..4 {
                let stream = if i % 2 == 0 { "vault:a" } else { "vault:b" };
                store
                    .append(
                        stream,
                        vec![test_event("vault.balance.updated", json!({"i": i}))],
                        AppendOptions::default(),
                    )
                    .unwrap();
            }
        }

        let store = EventStore::open_with_clock(
            JsonlEventLog::open(&path).unwrap(),
            EventStoreConfig::default(),
            fixed_clock(),
        )
        .unwrap();
        assert_eq!(store.stream_version("vault:a"), 2);
        assert_eq!(store.stream_version("vault:b"), 2);
        let report = store.verify_integrity();
        assert!(report.valid);
        assert_eq!(report.last_verified_position, 4);
    }

    /// The snapshot sibling detects state tampering.
    #[test]
    fn test_snapshot_store_detects_tampering() {
        let snapshots = InMemorySnapshotStore::with_clock(fixed_clock());
        let mut snapshot = snapshots
            .save(SnapshotInput {
                stream_id: "vault:a".to_string(),
                version: 4,
                state: json!({"balance": "250.00", "currency": "USDC"}),
            })
            .unwrap();
        assert!(snapshots.verify_integrity(&snapshot));

        snapshot.state["balance"] = json!("999.00");
        assert!(!snapshots.verify_integrity(&snapshot));
    }
}

//! # Reconciliation Flow
//!
//! Records in, attested report out: cross-decimal three-way matching,
//! L1 artifact dedup before the run, and the attestation landing in the
//! registrar with lineage.

#[cfg(test)]
mod tests {
    use crate::integration::fixed_clock;
    use at_03_registrum::{RegisterOutcome, Registrum, RegistrumConfig};
    use at_04_reconciliation::{
        prevent_double_counting, Attestor, MatchStatus, ReconcileOptions, ReconciliationScope,
        Reconciler,
    };
    use shared_types::{ChainEvent, ChainRef, Intent, IntentStatus, LedgerEntry, Money};

    fn chain(id: &str) -> ChainRef {
        ChainRef::parse(id).unwrap()
    }

    fn fixture() -> (Vec<Intent>, Vec<LedgerEntry>, Vec<ChainEvent>) {
        let intents = vec![Intent {
            id: "int-1".to_string(),
            status: IntentStatus::Executed,
            declared_at: "2025-06-15T00:00:00.000Z".to_string(),
            chain_id: Some(chain("eip155:1")),
            correlation_id: Some("c1".to_string()),
            amount: Some(Money::new("1.000000", "TOKEN", 6)),
            tx_hash: Some("0xdec".to_string()),
        }];
        let entries = vec![LedgerEntry {
            id: "led-1".to_string(),
            correlation_id: "c1".to_string(),
            money: Money::new("1.000000", "TOKEN", 6),
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
            tx_hash: Some("0xdec".to_string()),
        }];
        let events = vec![ChainEvent {
            chain_id: chain("eip155:1"),
            tx_hash: "0xdec".to_string(),
            from: "0xaaa".to_string(),
            to: "0xbbb".to_string(),
            amount: "1000000000000000000".to_string(),
            decimals: 18,
            symbol: "TOKEN".to_string(),
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
        }];
        (intents, entries, events)
    }

    fn pinned_options(id: &str) -> ReconcileOptions {
        ReconcileOptions {
            report_id: Some(id.to_string()),
            timestamp: Some("2025-06-15T00:00:00.000Z".to_string()),
        }
    }

    /// Scenario: 6-decimal ledger amount matches the 18-decimal raw chain
    /// amount; one flipped digit breaks it.
    #[test]
    fn test_cross_decimal_three_way_match() {
        let reconciler = Reconciler::with_clock(fixed_clock());
        let (intents, entries, events) = fixture();

        let clean = reconciler.reconcile(
            ReconciliationScope::default(),
            &intents,
            &entries,
            &events,
            pinned_options("recon:clean"),
        );
        assert!(clean.summary.all_reconciled);
        assert_eq!(
            clean.ledger_chain_matches[0].status,
            MatchStatus::Matched
        );

        let mut off = events.clone();
        off[0].amount = "999999999999999999".to_string();
        let dirty = reconciler.reconcile(
            ReconciliationScope::default(),
            &intents,
            &entries,
            &off,
            pinned_options("recon:dirty"),
        );
        assert!(!dirty.summary.all_reconciled);
        assert_eq!(
            dirty.ledger_chain_matches[0].status,
            MatchStatus::AmountMismatch
        );
        assert!(!dirty.summary.discrepancies.is_empty());
    }

    /// The L1 settlement artifact is dropped before the run, so the L2
    /// transfer reconciles without a phantom missing-ledger record.
    #[test]
    fn test_dedup_feeds_reconciliation() {
        let reconciler = Reconciler::with_clock(fixed_clock());
        let (intents, mut entries, _) = fixture();
        entries[0].tx_hash = Some("0xl2".to_string());

        let l2 = ChainEvent {
            chain_id: chain("eip155:42161"),
            tx_hash: "0xl2".to_string(),
            from: "0xaaa".to_string(),
            to: "0xbbb".to_string(),
            amount: "1000000".to_string(),
            decimals: 6,
            symbol: "TOKEN".to_string(),
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
        };
        let l1_artifact = ChainEvent {
            chain_id: chain("eip155:1"),
            tx_hash: "0xl1".to_string(),
            ..l2.clone()
        };

        let deduped = prevent_double_counting(&[l2, l1_artifact]);
        assert_eq!(deduped.kept.len(), 1);
        assert_eq!(deduped.removed.len(), 1);

        let mut scoped_intents = intents;
        scoped_intents[0].tx_hash = Some("0xl2".to_string());
        scoped_intents[0].chain_id = Some(chain("eip155:42161"));
        let report = reconciler.reconcile(
            ReconciliationScope::default(),
            &scoped_intents,
            &entries,
            &deduped.kept,
            pinned_options("recon:dedup"),
        );
        assert!(report.summary.all_reconciled, "{:?}", report.summary.discrepancies);
    }

    /// Attestation records register into the registrar and self-transition
    /// on repeat attestations.
    #[test]
    fn test_attestation_registers_with_lineage() {
        let reconciler = Reconciler::with_clock(fixed_clock());
        let attestor = Attestor::with_clock("auditor-1", fixed_clock());
        let mut registrum = Registrum::new(RegistrumConfig::default());
        let (intents, entries, events) = fixture();

        for run in 0..2u64 {
            let report = reconciler.reconcile(
                ReconciliationScope::default(),
                &intents,
                &entries,
                &events,
                pinned_options(&format!("recon:{run}")),
            );
            let record = attestor
                .attest(&report, Some(format!("att:{run}")))
                .unwrap();
            assert!(record.all_reconciled);
            match attestor.register(&mut registrum, &record).unwrap() {
                RegisterOutcome::Accepted { order_index } => {
                    assert_eq!(order_index, run)
                }
                other => panic!("expected acceptance, got {other:?}"),
            }
        }

        assert_eq!(registrum.state_count(), 1);
        assert_eq!(registrum.registered_count(), 2);
        assert_eq!(
            registrum.get_lineage("attestation:auditor-1").len(),
            2
        );
    }

    /// The observer façade feeds the reconciler: transfers come back
    /// block-sorted and deduplicated, and reconcile cleanly against the
    /// ledger.
    #[tokio::test]
    async fn test_observer_feeds_reconciler() {
        use at_08_chain_observer::{
            ChainObserver, InMemoryChainObserver, ObservedTransfer, TransferQuery,
        };

        let mut observer = InMemoryChainObserver::new(chain("eip155:1"));
        let (intents, entries, events) = fixture();
        observer.push_transfer(ObservedTransfer {
            block_number: 10,
            event: events[0].clone(),
        });

        let observed: Vec<ChainEvent> = observer
            .get_transfers(TransferQuery::all_for("0xbbb"))
            .await
            .unwrap()
            .into_iter()
            .map(|transfer| transfer.event)
            .collect();

        let report = Reconciler::with_clock(fixed_clock()).reconcile(
            ReconciliationScope::default(),
            &intents,
            &entries,
            &observed,
            pinned_options("recon:observed"),
        );
        assert!(report.summary.all_reconciled, "{:?}", report.summary.discrepancies);
    }

    /// Byte-identical reports for byte-identical inputs under pinned
    /// wall-clock fields.
    #[test]
    fn test_reconciliation_is_deterministic() {
        let (intents, entries, events) = fixture();
        let run = || {
            Reconciler::with_clock(fixed_clock()).reconcile(
                ReconciliationScope::default(),
                &intents,
                &entries,
                &events,
                pinned_options("recon:fixed"),
            )
        };
        assert_eq!(
            serde_json::to_string(&run()).unwrap(),
            serde_json::to_string(&run()).unwrap()
        );
    }
}

//! # Governance & Witness Flow
//!
//! The anchoring path under N-of-M control: quorum arithmetic, memo
//! round-trips, multi-sign submission gated by governance, and readback
//! verification against the ledger.

#[cfg(test)]
mod tests {
    use crate::integration::fixed_clock;
    use at_05_governance::GovernanceStore;
    use at_06_witness::{
        build_registrum_payload, decode_memo, encode_memo, verify_payload_hash,
        MockAnchorLedger, MockSigner, MultiSigSubmitter, RetryPolicy, SingleSignerSubmitter,
        TransactionSigner, WitnessError, WitnessVerifier,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn governance() -> GovernanceStore {
        let mut gov = GovernanceStore::with_clock(fixed_clock());
        gov.add_signer("rA", "ops-a", 1).unwrap();
        gov.add_signer("rB", "ops-b", 1).unwrap();
        gov.add_signer("rC", "ops-c", 1).unwrap();
        gov.change_quorum(2).unwrap();
        gov
    }

    /// Scenario: quorum math over three weight-1 signers at quorum 2,
    /// including the removal that would undercut it.
    #[test]
    fn test_governance_quorum_scenario() {
        let mut gov = governance();

        assert!(!gov.check_quorum(&["rA"]).met);
        assert_eq!(gov.check_quorum(&["rA"]).total_weight, 1);
        assert!(gov.check_quorum(&["rA", "rB"]).met);

        gov.remove_signer("rA").unwrap();
        let err = gov.remove_signer("rB").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");

        // Replay reproduces the surviving state exactly.
        let history = gov.event_history().to_vec();
        let mut replayed = GovernanceStore::with_clock(fixed_clock());
        replayed.replay_from(history);
        assert_eq!(
            serde_json::to_string(&replayed.current_policy()).unwrap(),
            serde_json::to_string(&gov.current_policy()).unwrap()
        );
    }

    /// Scenario: payload -> memo -> decode -> hash verifies; tampering the
    /// decoded summary breaks it.
    #[test]
    fn test_memo_round_trip_and_tamper() {
        let payload = build_registrum_payload(
            "attestation:auditor-1",
            0,
            "auditor-1",
            Some(json!({"matchedCount": 3})),
            fixed_clock().as_ref(),
        )
        .unwrap();

        let memo = encode_memo(&payload).unwrap();
        let decoded = decode_memo(&memo).unwrap();
        assert!(verify_payload_hash(&decoded));

        let mut tampered = decoded;
        tampered.summary["matchedCount"] = json!(99);
        assert!(!verify_payload_hash(&tampered));
    }

    /// Full multi-sign anchor: quorum check, independent signatures, one
    /// submission, then readback verification.
    #[tokio::test]
    async fn test_multisig_anchor_and_readback() {
        let ledger = Arc::new(MockAnchorLedger::new());
        let gov = governance();
        let payload = build_registrum_payload(
            "attestation:auditor-1",
            0,
            "auditor-1",
            None,
            fixed_clock().as_ref(),
        )
        .unwrap();

        let submitter = MultiSigSubmitter::with_clock(
            ledger.clone(),
            vec![
                Box::new(MockSigner::new("rA")) as Box<dyn TransactionSigner>,
                Box::new(MockSigner::new("rC")),
            ],
            "rVault",
            fixed_clock(),
        );
        let record = submitter.witness(&payload, &gov).await.unwrap();
        assert_eq!(ledger.transaction_count(), 1);

        let verifier = WitnessVerifier::new(ledger);
        let result = verifier.verify(&record).await.unwrap();
        assert!(result.verified, "discrepancies: {:?}", result.discrepancies);
        assert_eq!(result.payload.unwrap().hash, payload.hash);
    }

    /// One recognized signer is weight 1 < quorum 2: submission is blocked
    /// before the ledger sees anything.
    #[tokio::test]
    async fn test_insufficient_signers_never_reach_the_wire() {
        let ledger = Arc::new(MockAnchorLedger::new());
        let submitter = MultiSigSubmitter::with_clock(
            ledger.clone(),
            vec![Box::new(MockSigner::new("rB")) as Box<dyn TransactionSigner>],
            "rVault",
            fixed_clock(),
        );
        let payload = build_registrum_payload("s", 0, "auditor-1", None, fixed_clock().as_ref())
            .unwrap();

        let err = submitter.witness(&payload, &governance()).await.unwrap_err();
        assert_eq!(err.code(), "QUORUM_NOT_MET");
        assert_eq!(ledger.transaction_count(), 0);
    }

    /// Transient engine congestion retries through; the record then
    /// verifies by readback like any other anchor.
    #[tokio::test]
    async fn test_single_signer_retry_then_verify() {
        let ledger = Arc::new(MockAnchorLedger::new());
        ledger.fail_next_submits(2);
        let submitter = SingleSignerSubmitter::with_clock(
            ledger.clone(),
            MockSigner::new("rWitness"),
            "rWitness",
            RetryPolicy {
                max_attempts: 5,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
                jitter: Duration::from_millis(1),
            },
            fixed_clock(),
        );
        let payload = build_registrum_payload("s", 0, "auditor-1", None, fixed_clock().as_ref())
            .unwrap();

        let record = submitter.witness(&payload, None).await.unwrap();
        let result = WitnessVerifier::new(ledger).verify(&record).await.unwrap();
        assert!(result.verified);
    }

    /// A zero-length deadline cancels cleanly with a typed error.
    #[tokio::test]
    async fn test_deadline_cancellation_is_typed() {
        let ledger = Arc::new(MockAnchorLedger::new());
        ledger.fail_next_submits(100);
        let submitter = SingleSignerSubmitter::with_clock(
            ledger,
            MockSigner::new("rWitness"),
            "rWitness",
            RetryPolicy {
                max_attempts: 100,
                base_delay: Duration::from_millis(20),
                max_delay: Duration::from_millis(20),
                jitter: Duration::from_millis(1),
            },
            fixed_clock(),
        );
        let payload = build_registrum_payload("s", 0, "auditor-1", None, fixed_clock().as_ref())
            .unwrap();

        let err = submitter
            .witness(&payload, Some(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, WitnessError::Cancelled));
    }
}

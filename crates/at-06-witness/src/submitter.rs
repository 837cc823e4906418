//! # Submitters
//!
//! Single-signer submission wrapped in transient-only retry, and N-of-M
//! multi-sign submission gated by a governance quorum check before
//! anything touches the wire.

use crate::errors::WitnessError;
use crate::memo::encode_memo;
use crate::payload::WitnessPayload;
use crate::ports::outbound::{
    combine_multisig, AnchorLedgerClient, LedgerClientError, TransactionSigner,
};
use crate::retry::{is_non_retryable, retry_with_backoff, RetryError, RetryPolicy};
use at_05_governance::GovernanceStore;
use serde::{Deserialize, Serialize};
use shared_types::{ChainRef, Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Proof that a payload was anchored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessRecord {
    /// Record id.
    pub id: String,
    /// The anchored payload.
    pub payload: WitnessPayload,
    /// Chain the anchor landed on.
    pub chain_id: ChainRef,
    /// Anchoring transaction hash.
    pub tx_hash: String,
    /// Ledger index the transaction validated in.
    pub ledger_index: u64,
    /// RFC 3339 instant the record was produced.
    pub witnessed_at: String,
    /// Account that carried the self-send.
    pub witness_account: String,
}

fn ledger_error_is_retryable(error: &LedgerClientError) -> bool {
    match error {
        LedgerClientError::Protocol { .. } => false,
        LedgerClientError::Transient { message } => !is_non_retryable(message),
    }
}

fn submit_failed(payload: &WitnessPayload, attempts: u32, last: LedgerClientError) -> WitnessError {
    WitnessError::SubmitFailed {
        payload: Box::new(payload.clone()),
        attempts,
        last_error: last.to_string(),
    }
}

/// One signer, one account, retried submission.
pub struct SingleSignerSubmitter<C, S> {
    client: C,
    signer: S,
    account: String,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl<C, S> SingleSignerSubmitter<C, S>
where
    C: AnchorLedgerClient,
    S: TransactionSigner,
{
    /// Build a submitter with the system clock.
    pub fn new(client: C, signer: S, account: impl Into<String>, policy: RetryPolicy) -> Self {
        Self::with_clock(client, signer, account, policy, Arc::new(SystemClock))
    }

    /// Build a submitter with an explicit clock.
    pub fn with_clock(
        client: C,
        signer: S,
        account: impl Into<String>,
        policy: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            signer,
            account: account.into(),
            policy,
            clock,
        }
    }

    /// The ledger client (readback verification shares it in tests).
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Anchor a payload: encode the memo, then prepare/sign/submit under
    /// retry. Exhaustion surfaces the payload and attempt count; a
    /// deadline cancels without leaking in-flight state.
    pub async fn witness(
        &self,
        payload: &WitnessPayload,
        deadline: Option<Duration>,
    ) -> Result<WitnessRecord, WitnessError> {
        let memo = encode_memo(payload)?;

        let outcome = retry_with_backoff(
            &self.policy,
            ledger_error_is_retryable,
            deadline,
            || async {
                let prepared = self.client.prepare_self_send(&self.account, &memo).await?;
                let blob = self.signer.sign(&prepared)?;
                self.client.submit_and_wait(&blob).await
            },
        )
        .await;

        let anchored = match outcome {
            Ok(anchored) => anchored,
            Err(RetryError::Cancelled) => return Err(WitnessError::Cancelled),
            Err(RetryError::Exhausted { last, attempts })
            | Err(RetryError::NonRetryable {
                error: last,
                attempts,
            }) => return Err(submit_failed(payload, attempts, last)),
        };

        tracing::info!(
            "[at-06] ✓ payload {} anchored in tx {} (ledger {})",
            payload.hash,
            anchored.tx_hash,
            anchored.ledger_index
        );

        Ok(WitnessRecord {
            id: format!("wit:{}", Uuid::new_v4()),
            payload: payload.clone(),
            chain_id: self.client.chain_id().clone(),
            tx_hash: anchored.tx_hash,
            ledger_index: anchored.ledger_index,
            witnessed_at: self.clock.now_rfc3339(),
            witness_account: self.account.clone(),
        })
    }
}

/// N-of-M multi-sign submitter guarded by a governance policy.
pub struct MultiSigSubmitter<C> {
    client: C,
    signers: Vec<Box<dyn TransactionSigner>>,
    account: String,
    clock: Arc<dyn Clock>,
}

impl<C: AnchorLedgerClient> MultiSigSubmitter<C> {
    /// Build a multi-sign submitter with the system clock.
    pub fn new(
        client: C,
        signers: Vec<Box<dyn TransactionSigner>>,
        account: impl Into<String>,
    ) -> Self {
        Self::with_clock(client, signers, account, Arc::new(SystemClock))
    }

    /// Build a multi-sign submitter with an explicit clock.
    pub fn with_clock(
        client: C,
        signers: Vec<Box<dyn TransactionSigner>>,
        account: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            signers,
            account: account.into(),
            clock,
        }
    }

    /// Anchor a payload under the governance quorum: verify the collected
    /// signer addresses form a quorum, gather independent signatures,
    /// combine, and submit once.
    pub async fn witness(
        &self,
        payload: &WitnessPayload,
        governance: &GovernanceStore,
    ) -> Result<WitnessRecord, WitnessError> {
        let addresses: Vec<&str> = self.signers.iter().map(|s| s.address()).collect();
        let check = governance.check_quorum(&addresses);
        if !check.met {
            // Quorum failure surfaces before anything touches the wire.
            return Err(WitnessError::QuorumNotMet {
                collected_weight: check.total_weight,
                quorum: check.quorum,
            });
        }

        let memo = encode_memo(payload)?;
        let prepared = self
            .client
            .prepare_self_send(&self.account, &memo)
            .await
            .map_err(|err| submit_failed(payload, 1, err))?;

        let mut entries = Vec::with_capacity(self.signers.len());
        for signer in &self.signers {
            entries.push(
                signer
                    .sign_for_multisig(&prepared)
                    .map_err(|err| submit_failed(payload, 1, err))?,
            );
        }
        let blob = combine_multisig(&prepared, &entries)
            .map_err(|err| submit_failed(payload, 1, err))?;

        let anchored = self
            .client
            .submit_and_wait(&blob)
            .await
            .map_err(|err| submit_failed(payload, 1, err))?;

        tracing::info!(
            "[at-06] ✓ payload {} anchored by {} signer(s) in tx {}",
            payload.hash,
            entries.len(),
            anchored.tx_hash
        );

        Ok(WitnessRecord {
            id: format!("wit:{}", Uuid::new_v4()),
            payload: payload.clone(),
            chain_id: self.client.chain_id().clone(),
            tx_hash: anchored.tx_hash,
            ledger_index: anchored.ledger_index,
            witnessed_at: self.clock.now_rfc3339(),
            witness_account: self.account.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::build_registrum_payload;
    use crate::ports::outbound::{MockAnchorLedger, MockSigner};
    use shared_types::FixedClock;

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::at_epoch_millis(1_749_945_600_000))
    }

    fn payload() -> WitnessPayload {
        build_registrum_payload("s", 0, "auditor-1", None, fixed_clock().as_ref()).unwrap()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            jitter: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_single_signer_happy_path() {
        let submitter = SingleSignerSubmitter::with_clock(
            MockAnchorLedger::new(),
            MockSigner::new("rWitness"),
            "rWitness",
            fast_policy(),
            fixed_clock(),
        );
        let record = submitter.witness(&payload(), None).await.unwrap();

        assert_eq!(record.witness_account, "rWitness");
        assert_eq!(record.chain_id.to_string(), "xrpl:testnet");
        assert_eq!(record.witnessed_at, "2025-06-15T00:00:00.000Z");
        assert_eq!(submitter.client().transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_single_signer_retries_transient_failures() {
        let ledger = MockAnchorLedger::new();
        ledger.fail_next_submits(2);
        let submitter = SingleSignerSubmitter::with_clock(
            ledger,
            MockSigner::new("rWitness"),
            "rWitness",
            fast_policy(),
            fixed_clock(),
        );
        let record = submitter.witness(&payload(), None).await.unwrap();
        assert!(!record.tx_hash.is_empty());
    }

    #[tokio::test]
    async fn test_single_signer_exhaustion_carries_payload() {
        let ledger = MockAnchorLedger::new();
        ledger.fail_next_submits(10);
        let submitter = SingleSignerSubmitter::with_clock(
            ledger,
            MockSigner::new("rWitness"),
            "rWitness",
            fast_policy(),
            fixed_clock(),
        );
        let original = payload();
        match submitter.witness(&original, None).await.unwrap_err() {
            WitnessError::SubmitFailed {
                payload,
                attempts,
                last_error,
            } => {
                assert_eq!(*payload, original);
                assert_eq!(attempts, 3);
                assert!(last_error.contains("tooBUSY"));
            }
            other => panic!("expected SubmitFailed, got {other:?}"),
        }
    }

    fn quorum_governance() -> GovernanceStore {
        let mut governance = GovernanceStore::with_clock(fixed_clock());
        governance.add_signer("rA", "ops-a", 1).unwrap();
        governance.add_signer("rB", "ops-b", 1).unwrap();
        governance.add_signer("rC", "ops-c", 1).unwrap();
        governance.change_quorum(2).unwrap();
        governance
    }

    #[tokio::test]
    async fn test_multisig_meets_quorum_and_submits_once() {
        let submitter = MultiSigSubmitter::with_clock(
            MockAnchorLedger::new(),
            vec![
                Box::new(MockSigner::new("rA")) as Box<dyn TransactionSigner>,
                Box::new(MockSigner::new("rB")),
            ],
            "rVault",
            fixed_clock(),
        );
        let record = submitter
            .witness(&payload(), &quorum_governance())
            .await
            .unwrap();
        assert_eq!(record.witness_account, "rVault");
        assert_eq!(submitter.client.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_multisig_quorum_failure_blocks_submission() {
        let submitter = MultiSigSubmitter::with_clock(
            MockAnchorLedger::new(),
            vec![Box::new(MockSigner::new("rA")) as Box<dyn TransactionSigner>],
            "rVault",
            fixed_clock(),
        );
        match submitter
            .witness(&payload(), &quorum_governance())
            .await
            .unwrap_err()
        {
            WitnessError::QuorumNotMet {
                collected_weight,
                quorum,
            } => {
                assert_eq!(collected_weight, 1);
                assert_eq!(quorum, 2);
            }
            other => panic!("expected QuorumNotMet, got {other:?}"),
        }
        assert_eq!(submitter.client.transaction_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_signers_do_not_count_toward_quorum() {
        let submitter = MultiSigSubmitter::with_clock(
            MockAnchorLedger::new(),
            vec![
                Box::new(MockSigner::new("rX")) as Box<dyn TransactionSigner>,
                Box::new(MockSigner::new("rY")),
            ],
            "rVault",
            fixed_clock(),
        );
        assert!(matches!(
            submitter
                .witness(&payload(), &quorum_governance())
                .await
                .unwrap_err(),
            WitnessError::QuorumNotMet {
                collected_weight: 0,
                ..
            }
        ));
    }
}

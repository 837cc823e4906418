//! # Readback Verifier
//!
//! Fetches the anchoring transaction, locates the attestia memo, decodes
//! the payload, and checks both the recorded hash and the payload's own
//! content hash. Every anomaly lands in `discrepancies`; nothing is
//! silently dropped.

use crate::errors::WitnessError;
use crate::memo::{decode_memo, is_witness_memo};
use crate::payload::{verify_payload_hash, WitnessPayload};
use crate::ports::outbound::AnchorLedgerClient;
use crate::submitter::WitnessRecord;
use serde::{Deserialize, Serialize};

/// Outcome of a readback verification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// True iff every check held.
    pub verified: bool,
    /// The transaction that was checked.
    pub tx_hash: String,
    /// Every anomaly found, in check order.
    pub discrepancies: Vec<String>,
    /// The decoded payload, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<WitnessPayload>,
}

/// Verifies witness records against the ledger.
pub struct WitnessVerifier<C> {
    client: C,
}

impl<C: AnchorLedgerClient> WitnessVerifier<C> {
    /// Verifier over the given ledger client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Verify a witness record by reading its transaction back.
    pub async fn verify(&self, record: &WitnessRecord) -> Result<VerificationResult, WitnessError> {
        let mut discrepancies = Vec::new();

        let transaction = self
            .client
            .fetch_transaction(&record.tx_hash)
            .await
            .map_err(|err| WitnessError::LedgerRead {
                detail: err.to_string(),
            })?;

        let decoded = match transaction {
            None => {
                discrepancies
                    .push(format!("transaction {} not found on ledger", record.tx_hash));
                None
            }
            Some(transaction) => {
                if !transaction.validated {
                    discrepancies
                        .push(format!("transaction {} is not validated", record.tx_hash));
                }
                match transaction.memos.iter().find(|memo| is_witness_memo(memo)) {
                    None => {
                        discrepancies.push(format!(
                            "transaction {} carries no attestia witness memo",
                            record.tx_hash
                        ));
                        None
                    }
                    Some(memo) => match decode_memo(memo) {
                        Ok(payload) => Some(payload),
                        Err(err) => {
                            discrepancies.push(format!("memo decode failed: {err}"));
                            None
                        }
                    },
                }
            }
        };

        if let Some(payload) = &decoded {
            if payload.hash != record.payload.hash {
                discrepancies.push(format!(
                    "anchored hash {} does not match recorded hash {}",
                    payload.hash, record.payload.hash
                ));
            }
            if !verify_payload_hash(payload) {
                discrepancies.push("decoded payload fails its own content hash".to_string());
            }
        }

        Ok(VerificationResult {
            verified: discrepancies.is_empty(),
            tx_hash: record.tx_hash.clone(),
            discrepancies,
            payload: decoded,
        })
    }

    /// Decode the witness payload anchored in `tx_hash`, if any.
    pub async fn fetch_payload(
        &self,
        tx_hash: &str,
    ) -> Result<Option<WitnessPayload>, WitnessError> {
        let transaction = self
            .client
            .fetch_transaction(tx_hash)
            .await
            .map_err(|err| WitnessError::LedgerRead {
                detail: err.to_string(),
            })?;
        Ok(transaction
            .and_then(|tx| tx.memos.into_iter().find(|memo| is_witness_memo(memo)))
            .and_then(|memo| decode_memo(&memo).ok()))
    }
}

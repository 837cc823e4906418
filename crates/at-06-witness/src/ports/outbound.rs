//! # Outbound Ports (Driven Ports)
//!
//! What the witness pipeline requires from its host: a ledger client for
//! an XRPL-style ledger with memo support, and transaction signers.
//! Production adapters wrap real RPC clients and key stores outside the
//! core; the mocks below back the test suites.

use crate::memo::WitnessMemo;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::ChainRef;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Ledger client failures. The message text drives the retryability
/// classifier, mirroring how ledger engine results arrive as strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerClientError {
    /// Transient transport or engine congestion.
    #[error("{message}")]
    Transient {
        /// Engine/transport message.
        message: String,
    },

    /// Protocol-permanent rejection.
    #[error("{message}")]
    Protocol {
        /// Engine message.
        message: String,
    },
}

/// A transaction with sequence and fee autofilled, ready to sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTransaction {
    /// Sending (and receiving) account.
    pub account: String,
    /// Destination; equals `account` for witness self-sends.
    pub destination: String,
    /// Amount in the ledger's smallest unit; always `"1"` for witnesses.
    pub amount: String,
    /// Autofilled account sequence.
    pub sequence: u32,
    /// Autofilled fee in the ledger's smallest unit.
    pub fee: String,
    /// The witness memo.
    pub memo: WitnessMemo,
}

/// One signer's contribution in multi-sign mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigEntry {
    /// Signing address.
    pub signer_address: String,
    /// Signature blob over the prepared transaction.
    pub signature: String,
}

/// A fully signed transaction ready for submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedBlob {
    /// Serialized signed transaction.
    pub blob: String,
    /// Addresses whose signatures the blob carries.
    pub signer_addresses: Vec<String>,
}

/// A transaction as read back from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchoredTransaction {
    /// Transaction hash.
    pub tx_hash: String,
    /// Ledger index the transaction validated in.
    pub ledger_index: u64,
    /// Memos the transaction carries.
    pub memos: Vec<WitnessMemo>,
    /// Whether the ledger reports the transaction validated.
    pub validated: bool,
}

/// An XRPL-style ledger that supports memos on payments.
#[async_trait]
pub trait AnchorLedgerClient: Send + Sync {
    /// Chain this client anchors to.
    fn chain_id(&self) -> &ChainRef;

    /// Build a 1-unit self-send carrying `memo`, autofilling sequence and
    /// fee.
    async fn prepare_self_send(
        &self,
        account: &str,
        memo: &WitnessMemo,
    ) -> Result<PreparedTransaction, LedgerClientError>;

    /// Submit a signed blob and await validation.
    async fn submit_and_wait(
        &self,
        blob: &SignedBlob,
    ) -> Result<AnchoredTransaction, LedgerClientError>;

    /// Fetch a validated transaction by hash.
    async fn fetch_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<Option<AnchoredTransaction>, LedgerClientError>;
}

#[async_trait]
impl<T: AnchorLedgerClient + ?Sized> AnchorLedgerClient for std::sync::Arc<T> {
    fn chain_id(&self) -> &ChainRef {
        (**self).chain_id()
    }

    async fn prepare_self_send(
        &self,
        account: &str,
        memo: &WitnessMemo,
    ) -> Result<PreparedTransaction, LedgerClientError> {
        (**self).prepare_self_send(account, memo).await
    }

    async fn submit_and_wait(
        &self,
        blob: &SignedBlob,
    ) -> Result<AnchoredTransaction, LedgerClientError> {
        (**self).submit_and_wait(blob).await
    }

    async fn fetch_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<Option<AnchoredTransaction>, LedgerClientError> {
        (**self).fetch_transaction(tx_hash).await
    }
}

/// Signs prepared transactions.
pub trait TransactionSigner: Send + Sync {
    /// Address this signer signs as.
    fn address(&self) -> &str;

    /// Single-signer signing.
    fn sign(&self, prepared: &PreparedTransaction) -> Result<SignedBlob, LedgerClientError>;

    /// Multi-sign mode: contribute one signature without finalizing.
    fn sign_for_multisig(
        &self,
        prepared: &PreparedTransaction,
    ) -> Result<MultisigEntry, LedgerClientError>;
}

/// Combine independent multi-sign contributions into one submit-once blob.
pub fn combine_multisig(
    prepared: &PreparedTransaction,
    entries: &[MultisigEntry],
) -> Result<SignedBlob, LedgerClientError> {
    let envelope = serde_json::json!({
        "transaction": prepared,
        "signers": entries,
    });
    let blob = serde_json::to_string(&envelope).map_err(|err| LedgerClientError::Protocol {
        message: format!("malformed multi-sign envelope: {err}"),
    })?;
    Ok(SignedBlob {
        blob,
        signer_addresses: entries
            .iter()
            .map(|entry| entry.signer_address.clone())
            .collect(),
    })
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production: RPC-backed adapters outside the core
// Testing: in-memory mocks below
// =============================================================================

/// In-memory ledger with configurable transient failures.
pub struct MockAnchorLedger {
    chain_id: ChainRef,
    sequence: AtomicU32,
    ledger_index: AtomicU64,
    fail_submits: AtomicU32,
    transactions: Mutex<Vec<AnchoredTransaction>>,
}

impl MockAnchorLedger {
    /// New mock ledger on `xrpl:testnet`.
    pub fn new() -> Self {
        Self {
            chain_id: ChainRef::parse("xrpl:testnet").expect("static chain ref"),
            sequence: AtomicU32::new(1),
            ledger_index: AtomicU64::new(100),
            fail_submits: AtomicU32::new(0),
            transactions: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next `count` submits with a transient engine error.
    pub fn fail_next_submits(&self, count: u32) {
        self.fail_submits.store(count, Ordering::SeqCst);
    }

    /// Number of validated transactions.
    pub fn transaction_count(&self) -> usize {
        self.transactions.lock().expect("poisoned").len()
    }
}

impl Default for MockAnchorLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnchorLedgerClient for MockAnchorLedger {
    fn chain_id(&self) -> &ChainRef {
        &self.chain_id
    }

    async fn prepare_self_send(
        &self,
        account: &str,
        memo: &WitnessMemo,
    ) -> Result<PreparedTransaction, LedgerClientError> {
        Ok(PreparedTransaction {
            account: account.to_string(),
            destination: account.to_string(),
            amount: "1".to_string(),
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
            fee: "10".to_string(),
            memo: memo.clone(),
        })
    }

    async fn submit_and_wait(
        &self,
        blob: &SignedBlob,
    ) -> Result<AnchoredTransaction, LedgerClientError> {
        let remaining = self.fail_submits.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_submits.store(remaining - 1, Ordering::SeqCst);
            return Err(LedgerClientError::Transient {
                message: "tooBUSY: the server is too busy to help you now".to_string(),
            });
        }

        // The mock blob is the JSON envelope produced by signers.
        let envelope: serde_json::Value =
            serde_json::from_str(&blob.blob).map_err(|err| LedgerClientError::Protocol {
                message: format!("malformed blob: {err}"),
            })?;
        let prepared: PreparedTransaction = serde_json::from_value(
            envelope
                .get("transaction")
                .cloned()
                .unwrap_or(envelope.clone()),
        )
        .map_err(|err| LedgerClientError::Protocol {
            message: format!("malformed transaction: {err}"),
        })?;

        let ledger_index = self.ledger_index.fetch_add(1, Ordering::SeqCst);
        let anchored = AnchoredTransaction {
            tx_hash: format!("{:064X}", ledger_index),
            ledger_index,
            memos: vec![prepared.memo],
            validated: true,
        };
        self.transactions
            .lock()
            .expect("poisoned")
            .push(anchored.clone());
        Ok(anchored)
    }

    async fn fetch_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<Option<AnchoredTransaction>, LedgerClientError> {
        Ok(self
            .transactions
            .lock()
            .expect("poisoned")
            .iter()
            .find(|tx| tx.tx_hash == tx_hash)
            .cloned())
    }
}

/// Deterministic mock signer; "signatures" are labeled digests, which is
/// all the pipeline needs since signature validity is the ledger's
/// concern.
pub struct MockSigner {
    address: String,
}

impl MockSigner {
    /// Signer for the given address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    fn signature_over(&self, prepared: &PreparedTransaction) -> String {
        let serialized = serde_json::to_string(prepared).unwrap_or_default();
        format!(
            "{}:{}",
            self.address,
            shared_crypto::sha256_hex(serialized.as_bytes())
        )
    }
}

impl TransactionSigner for MockSigner {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, prepared: &PreparedTransaction) -> Result<SignedBlob, LedgerClientError> {
        let envelope = serde_json::json!({
            "transaction": prepared,
            "signature": self.signature_over(prepared),
        });
        Ok(SignedBlob {
            blob: envelope.to_string(),
            signer_addresses: vec![self.address.clone()],
        })
    }

    fn sign_for_multisig(
        &self,
        prepared: &PreparedTransaction,
    ) -> Result<MultisigEntry, LedgerClientError> {
        Ok(MultisigEntry {
            signer_address: self.address.clone(),
            signature: self.signature_over(prepared),
        })
    }
}

//! # Query & Transfer Types

use serde::{Deserialize, Serialize};
use shared_types::ChainEvent;

/// Which side of a transfer the queried address must occupy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    /// Queried address is the recipient.
    Incoming,
    /// Queried address is the sender.
    Outgoing,
    /// Either side.
    #[default]
    Both,
}

/// A transfer query against one chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuery {
    /// Address whose transfers to return.
    pub address: String,
    /// Side filter.
    #[serde(default)]
    pub direction: TransferDirection,
    /// Inclusive lower block bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_block: Option<u64>,
    /// Inclusive upper block bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_block: Option<u64>,
    /// Cap on returned transfers, applied after sorting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl TransferQuery {
    /// Query every transfer touching `address`.
    pub fn all_for(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            direction: TransferDirection::Both,
            from_block: None,
            to_block: None,
            limit: None,
        }
    }
}

/// A transfer as the observer saw it: the reconcilable chain event plus
/// its block placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedTransfer {
    /// Block the transaction was included in.
    pub block_number: u64,
    /// The reconcilable event.
    #[serde(flatten)]
    pub event: ChainEvent,
}

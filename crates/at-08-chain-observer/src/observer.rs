//! # Observer Port & In-Memory Implementation
//!
//! The async read-only port plus the reference implementation that
//! enforces the sorting/dedup/limit contract and backs the test suites.

use crate::errors::ObserverError;
use crate::types::{ObservedTransfer, TransferDirection, TransferQuery};
use async_trait::async_trait;
use shared_types::ChainRef;
use std::collections::HashMap;
use std::collections::HashSet;

/// Read-only view of one chain.
#[async_trait]
pub trait ChainObserver: Send + Sync {
    /// The chain this observer watches.
    fn chain_id(&self) -> &ChainRef;

    /// Native-unit balance of an address.
    async fn get_balance(&self, address: &str) -> Result<String, ObserverError>;

    /// Token balance of an address.
    async fn get_token_balance(
        &self,
        address: &str,
        symbol: &str,
    ) -> Result<String, ObserverError>;

    /// Transfers matching the query, sorted by block number ascending,
    /// deduplicated by txHash, capped at `limit` after sorting.
    async fn get_transfers(
        &self,
        query: TransferQuery,
    ) -> Result<Vec<ObservedTransfer>, ObserverError>;
}

/// Reference implementation over pre-loaded fixtures.
pub struct InMemoryChainObserver {
    chain_id: ChainRef,
    balances: HashMap<String, String>,
    token_balances: HashMap<(String, String), String>,
    transfers: Vec<ObservedTransfer>,
}

impl InMemoryChainObserver {
    /// Empty observer for the given chain.
    pub fn new(chain_id: ChainRef) -> Self {
        Self {
            chain_id,
            balances: HashMap::new(),
            token_balances: HashMap::new(),
            transfers: Vec::new(),
        }
    }

    /// Load a native balance.
    pub fn set_balance(&mut self, address: impl Into<String>, balance: impl Into<String>) {
        self.balances.insert(address.into(), balance.into());
    }

    /// Load a token balance.
    pub fn set_token_balance(
        &mut self,
        address: impl Into<String>,
        symbol: impl Into<String>,
        balance: impl Into<String>,
    ) {
        self.token_balances
            .insert((address.into(), symbol.into()), balance.into());
    }

    /// Load a transfer.
    pub fn push_transfer(&mut self, transfer: ObservedTransfer) {
        self.transfers.push(transfer);
    }
}

#[async_trait]
impl ChainObserver for InMemoryChainObserver {
    fn chain_id(&self) -> &ChainRef {
        &self.chain_id
    }

    async fn get_balance(&self, address: &str) -> Result<String, ObserverError> {
        self.balances
            .get(address)
            .cloned()
            .ok_or_else(|| ObserverError::UnknownAddress {
                address: address.to_string(),
            })
    }

    async fn get_token_balance(
        &self,
        address: &str,
        symbol: &str,
    ) -> Result<String, ObserverError> {
        self.token_balances
            .get(&(address.to_string(), symbol.to_string()))
            .cloned()
            .ok_or_else(|| ObserverError::UnknownToken {
                address: address.to_string(),
                symbol: symbol.to_string(),
            })
    }

    async fn get_transfers(
        &self,
        query: TransferQuery,
    ) -> Result<Vec<ObservedTransfer>, ObserverError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut selected: Vec<ObservedTransfer> = Vec::new();
        for transfer in &self.transfers {
            let direction_matches = match query.direction {
                TransferDirection::Incoming => transfer.event.to == query.address,
                TransferDirection::Outgoing => transfer.event.from == query.address,
                TransferDirection::Both => {
                    transfer.event.to == query.address || transfer.event.from == query.address
                }
            };
            if !direction_matches {
                continue;
            }
            if let Some(from_block) = query.from_block {
                if transfer.block_number < from_block {
                    continue;
                }
            }
            if let Some(to_block) = query.to_block {
                if transfer.block_number > to_block {
                    continue;
                }
            }
            // A self-transfer matches both sides of a `both` union; one
            // record per txHash.
            if !seen.insert(transfer.event.tx_hash.as_str()) {
                continue;
            }
            selected.push(transfer.clone());
        }

        selected.sort_by_key(|transfer| transfer.block_number);
        if let Some(limit) = query.limit {
            selected.truncate(limit);
        }
        Ok(selected)
    }
}

//! # Ledger ↔ Chain Matcher
//!
//! Pairs ledger postings with on-chain transfers by transaction hash,
//! compares amounts cross-decimal, and reports chain events no posting
//! accounts for.

use super::compare_money_to_chain;
use crate::report::{LedgerChainMatch, MatchStatus};
use shared_types::{ChainEvent, LedgerEntry};
use std::collections::{HashMap, HashSet};

/// Match ledger entries against chain events.
///
/// Only entries carrying a `tx_hash` participate; a chain event whose
/// hash was never referenced by any entry becomes a `missing-ledger`
/// record.
pub fn match_ledger_to_chain(
    entries: &[&LedgerEntry],
    events: &[&ChainEvent],
) -> Vec<LedgerChainMatch> {
    let mut by_tx: HashMap<&str, Vec<&ChainEvent>> = HashMap::new();
    for event in events {
        by_tx.entry(event.tx_hash.as_str()).or_default().push(event);
    }

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut matches = Vec::new();

    for entry in entries {
        let tx_hash = match &entry.tx_hash {
            Some(tx_hash) => tx_hash.as_str(),
            None => continue,
        };
        consumed.insert(tx_hash);

        let candidates = match by_tx.get(tx_hash) {
            Some(candidates) => candidates,
            None => {
                matches.push(LedgerChainMatch {
                    ledger_entry_id: Some(entry.id.clone()),
                    tx_hash: tx_hash.to_string(),
                    status: MatchStatus::MissingChain,
                    discrepancies: vec![format!(
                        "no chain event observed for tx {tx_hash}"
                    )],
                });
                continue;
            }
        };

        let same_currency = candidates
            .iter()
            .find(|event| event.symbol == entry.money.currency);
        let event = match same_currency {
            Some(event) => event,
            None => {
                let seen: Vec<&str> =
                    candidates.iter().map(|e| e.symbol.as_str()).collect();
                matches.push(LedgerChainMatch {
                    ledger_entry_id: Some(entry.id.clone()),
                    tx_hash: tx_hash.to_string(),
                    status: MatchStatus::AmountMismatch,
                    discrepancies: vec![format!(
                        "currency mismatch for tx {tx_hash}: ledger posted {}, chain carried {:?}",
                        entry.money.currency, seen
                    )],
                });
                continue;
            }
        };

        match compare_money_to_chain(&entry.money, event) {
            Ok(true) => matches.push(LedgerChainMatch {
                ledger_entry_id: Some(entry.id.clone()),
                tx_hash: tx_hash.to_string(),
                status: MatchStatus::Matched,
                discrepancies: Vec::new(),
            }),
            Ok(false) => matches.push(LedgerChainMatch {
                ledger_entry_id: Some(entry.id.clone()),
                tx_hash: tx_hash.to_string(),
                status: MatchStatus::AmountMismatch,
                discrepancies: vec![format!(
                    "amount mismatch for tx {tx_hash}: ledger {} {} at {} decimal(s) vs chain raw {} at {} decimal(s)",
                    entry.money.amount,
                    entry.money.currency,
                    entry.money.decimals,
                    event.amount,
                    event.decimals
                )],
            }),
            Err(detail) => matches.push(LedgerChainMatch {
                ledger_entry_id: Some(entry.id.clone()),
                tx_hash: tx_hash.to_string(),
                status: MatchStatus::AmountMismatch,
                discrepancies: vec![format!("tx {tx_hash}: {detail}")],
            }),
        }
    }

    for event in events {
        if !consumed.contains(event.tx_hash.as_str()) {
            // Report each orphaned hash once.
            consumed.insert(event.tx_hash.as_str());
            matches.push(LedgerChainMatch {
                ledger_entry_id: None,
                tx_hash: event.tx_hash.clone(),
                status: MatchStatus::MissingLedger,
                discrepancies: vec![format!(
                    "no ledger entry references tx {} on {}",
                    event.tx_hash, event.chain_id
                )],
            });
        }
    }

    matches
}

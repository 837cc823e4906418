//! # Intent ↔ Chain Matcher
//!
//! Joins intents to on-chain transfers through the (chainId, txHash) pair
//! recorded on the intent's execution record and compares the declared
//! amount against the observed raw amount.

use super::compare_money_to_chain;
use crate::report::{IntentChainMatch, MatchStatus};
use shared_types::{ChainEvent, Intent};

/// Match intents against chain events.
///
/// Intents with no execution record yet (`tx_hash` absent) report as
/// `missing-chain`; chain events no intent claims are the ledger ↔ chain
/// matcher's concern and are not re-reported here.
pub fn match_intents_to_chain(
    intents: &[&Intent],
    events: &[&ChainEvent],
) -> Vec<IntentChainMatch> {
    let mut matches = Vec::new();
    for intent in intents {
        let tx_hash = match &intent.tx_hash {
            Some(tx_hash) => tx_hash.as_str(),
            None => {
                matches.push(IntentChainMatch {
                    intent_id: intent.id.clone(),
                    tx_hash: None,
                    status: MatchStatus::MissingChain,
                    discrepancies: vec![format!(
                        "intent {} has no execution record to join on",
                        intent.id
                    )],
                });
                continue;
            }
        };

        let event = events.iter().find(|event| {
            event.tx_hash == tx_hash
                && intent
                    .chain_id
                    .as_ref()
                    .map_or(true, |chain| &event.chain_id == chain)
        });
        let event = match event {
            Some(event) => event,
            None => {
                matches.push(IntentChainMatch {
                    intent_id: intent.id.clone(),
                    tx_hash: Some(tx_hash.to_string()),
                    status: MatchStatus::MissingChain,
                    discrepancies: vec![format!(
                        "no chain event observed for tx {tx_hash} declared by intent {}",
                        intent.id
                    )],
                });
                continue;
            }
        };

        let (status, discrepancies) = match &intent.amount {
            None => (MatchStatus::Matched, Vec::new()),
            Some(declared) if declared.currency != event.symbol => (
                MatchStatus::AmountMismatch,
                vec![format!(
                    "currency mismatch for tx {tx_hash}: intent declared {}, chain carried {}",
                    declared.currency, event.symbol
                )],
            ),
            Some(declared) => match compare_money_to_chain(declared, event) {
                Ok(true) => (MatchStatus::Matched, Vec::new()),
                Ok(false) => (
                    MatchStatus::AmountMismatch,
                    vec![format!(
                        "amount mismatch for tx {tx_hash}: intent declared {} {} at {} decimal(s) vs chain raw {} at {} decimal(s)",
                        declared.amount,
                        declared.currency,
                        declared.decimals,
                        event.amount,
                        event.decimals
                    )],
                ),
                Err(detail) => (
                    MatchStatus::AmountMismatch,
                    vec![format!("tx {tx_hash}: {detail}")],
                ),
            },
        };

        matches.push(IntentChainMatch {
            intent_id: intent.id.clone(),
            tx_hash: Some(tx_hash.to_string()),
            status,
            discrepancies,
        });
    }

    matches
}

//! # Intent ↔ Ledger Matcher
//!
//! Joins declared intents to ledger postings by correlation id and
//! compares declared against posted amounts in the intent's currency.

use super::compare_money;
use crate::report::{IntentLedgerMatch, MatchStatus};
use shared_types::{Intent, LedgerEntry};
use std::collections::{HashMap, HashSet};

/// Match intents against ledger entries.
pub fn match_intents_to_ledger(
    intents: &[&Intent],
    entries: &[&LedgerEntry],
) -> Vec<IntentLedgerMatch> {
    let mut by_correlation: HashMap<&str, Vec<&LedgerEntry>> = HashMap::new();
    for entry in entries {
        by_correlation
            .entry(entry.correlation_id.as_str())
            .or_default()
            .push(entry);
    }

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut matches = Vec::new();

    for intent in intents {
        let correlation_id = match &intent.correlation_id {
            Some(correlation_id) => correlation_id.as_str(),
            None => {
                matches.push(IntentLedgerMatch {
                    intent_id: Some(intent.id.clone()),
                    ledger_entry_id: None,
                    correlation_id: None,
                    status: MatchStatus::MissingLedger,
                    discrepancies: vec![format!(
                        "intent {} carries no correlation id to join on",
                        intent.id
                    )],
                });
                continue;
            }
        };

        let posted = match by_correlation.get(correlation_id) {
            Some(posted) => posted,
            None => {
                matches.push(IntentLedgerMatch {
                    intent_id: Some(intent.id.clone()),
                    ledger_entry_id: None,
                    correlation_id: Some(correlation_id.to_string()),
                    status: MatchStatus::MissingLedger,
                    discrepancies: vec![format!(
                        "no ledger posting for correlation {correlation_id}"
                    )],
                });
                continue;
            }
        };
        consumed.insert(correlation_id);

        // One posting per intent is the normal shape; extras are noted.
        let entry = posted[0];
        let mut discrepancies = Vec::new();
        if posted.len() > 1 {
            discrepancies.push(format!(
                "{} postings share correlation {correlation_id}; compared against {}",
                posted.len(),
                entry.id
            ));
        }

        let status = match &intent.amount {
            None => MatchStatus::Matched,
            Some(declared) => {
                if declared.currency != entry.money.currency {
                    discrepancies.push(format!(
                        "currency mismatch for correlation {correlation_id}: intent declared {}, ledger posted {}",
                        declared.currency, entry.money.currency
                    ));
                    MatchStatus::AmountMismatch
                } else {
                    match compare_money(declared, &entry.money) {
                        Ok(true) => MatchStatus::Matched,
                        Ok(false) => {
                            discrepancies.push(format!(
                                "amount mismatch for correlation {correlation_id}: intent declared {} {}, ledger posted {} {}",
                                declared.amount,
                                declared.currency,
                                entry.money.amount,
                                entry.money.currency
                            ));
                            MatchStatus::AmountMismatch
                        }
                        Err(detail) => {
                            discrepancies
                                .push(format!("correlation {correlation_id}: {detail}"));
                            MatchStatus::AmountMismatch
                        }
                    }
                }
            }
        };

        matches.push(IntentLedgerMatch {
            intent_id: Some(intent.id.clone()),
            ledger_entry_id: Some(entry.id.clone()),
            correlation_id: Some(correlation_id.to_string()),
            status,
            discrepancies,
        });
    }

    for entry in entries {
        if !consumed.contains(entry.correlation_id.as_str()) {
            consumed.insert(entry.correlation_id.as_str());
            matches.push(IntentLedgerMatch {
                intent_id: None,
                ledger_entry_id: Some(entry.id.clone()),
                correlation_id: Some(entry.correlation_id.clone()),
                status: MatchStatus::MissingIntent,
                discrepancies: vec![format!(
                    "no intent declared correlation {}",
                    entry.correlation_id
                )],
            });
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{IntentStatus, Money};

    fn intent(id: &str, correlation: Option<&str>, amount: Option<Money>) -> Intent {
        Intent {
            id: id.to_string(),
            status: IntentStatus::Executing,
            declared_at: "2025-06-15T00:00:00.000Z".to_string(),
            chain_id: None,
            correlation_id: correlation.map(str::to_string),
            amount,
            tx_hash: None,
        }
    }

    fn entry(id: &str, correlation: &str, money: Money) -> LedgerEntry {
        LedgerEntry {
            id: id.to_string(),
            correlation_id: correlation.to_string(),
            money,
            timestamp: "2025-06-15T00:00:00.000Z".to_string(),
            tx_hash: None,
        }
    }

    fn run(intents: &[Intent], entries: &[LedgerEntry]) -> Vec<IntentLedgerMatch> {
        let intents: Vec<&Intent> = intents.iter().collect();
        let entries: Vec<&LedgerEntry> = entries.iter().collect();
        match_intents_to_ledger(&intents, &entries)
    }

    #[test]
    fn test_correlation_join_with_equal_amounts() {
        let intents = vec![intent("int-1", Some("c1"), Some(Money::new("100.00", "USDC", 2)))];
        let entries = vec![entry("led-1", "c1", Money::new("100.000000", "USDC", 6))];
        let matches = run(&intents, &entries);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].status, MatchStatus::Matched);
    }

    #[test]
    fn test_currency_must_match_exactly() {
        let intents = vec![intent("int-1", Some("c1"), Some(Money::new("100.00", "USD", 2)))];
        let entries = vec![entry("led-1", "c1", Money::new("100.00", "USDC", 2))];
        let matches = run(&intents, &entries);
        assert_eq!(matches[0].status, MatchStatus::AmountMismatch);
        assert!(matches[0].discrepancies[0].contains("currency mismatch"));
    }

    #[test]
    fn test_intent_without_posting() {
        let intents = vec![intent("int-1", Some("c1"), None)];
        let matches = run(&intents, &[]);
        assert_eq!(matches[0].status, MatchStatus::MissingLedger);
    }

    #[test]
    fn test_posting_without_intent() {
        let entries = vec![entry("led-1", "c9", Money::new("5.00", "USDC", 2))];
        let matches = run(&[], &entries);
        assert_eq!(matches[0].status, MatchStatus::MissingIntent);
        assert!(matches[0].intent_id.is_none());
    }

    #[test]
    fn test_intent_without_correlation_id() {
        let intents = vec![intent("int-1", None, None)];
        let matches = run(&intents, &[]);
        assert_eq!(matches[0].status, MatchStatus::MissingLedger);
        assert!(matches[0].discrepancies[0].contains("no correlation id"));
    }

    #[test]
    fn test_amountless_intent_matches_on_presence() {
        let intents = vec![intent("int-1", Some("c1"), None)];
        let entries = vec![entry("led-1", "c1", Money::new("42.00", "USDC", 2))];
        let matches = run(&intents, &entries);
        assert_eq!(matches[0].status, MatchStatus::Matched);
    }

    #[test]
    fn test_multiple_postings_noted() {
        let intents = vec![intent("int-1", Some("c1"), Some(Money::new("1.00", "USDC", 2)))];
        let entries = vec![
            entry("led-1", "c1", Money::new("1.00", "USDC", 2)),
            entry("led-2", "c1", Money::new("1.00", "USDC", 2)),
        ];
        let matches = run(&intents, &entries);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].status, MatchStatus::Matched);
        assert!(matches[0].discrepancies[0].contains("2 postings"));
    }
}

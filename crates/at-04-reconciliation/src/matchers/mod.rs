//! # Matchers
//!
//! The three pure pairing functions. No I/O, no clocks, no mutation:
//! slices in, match records out, every anomaly carried as a discrepancy
//! string rather than dropped.

mod intent_chain;
mod intent_ledger;
mod ledger_chain;

pub use intent_chain::match_intents_to_chain;
pub use intent_ledger::match_intents_to_ledger;
pub use ledger_chain::match_ledger_to_chain;

use crate::amounts::{amounts_equal, parse_decimal, parse_raw};
use shared_types::{ChainEvent, Money};

/// Compare a declared [`Money`] against a raw on-chain amount in the
/// common decimal basis, degrading parse failures into discrepancies.
pub(crate) fn compare_money_to_chain(money: &Money, event: &ChainEvent) -> Result<bool, String> {
    let declared = parse_decimal(&money.amount, money.decimals)
        .map_err(|err| format!("unparseable ledger amount: {err}"))?;
    let observed = parse_raw(&event.amount)
        .map_err(|err| format!("unparseable chain amount: {err}"))?;
    amounts_equal(declared, money.decimals, observed, event.decimals)
        .map_err(|err| format!("amount comparison overflow: {err}"))
}

/// Compare two declared [`Money`] values in the common decimal basis.
pub(crate) fn compare_money(a: &Money, b: &Money) -> Result<bool, String> {
    let left = parse_decimal(&a.amount, a.decimals)
        .map_err(|err| format!("unparseable amount: {err}"))?;
    let right = parse_decimal(&b.amount, b.decimals)
        .map_err(|err| format!("unparseable amount: {err}"))?;
    amounts_equal(left, a.decimals, right, b.decimals)
        .map_err(|err| format!("amount comparison overflow: {err}"))
}

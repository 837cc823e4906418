//! # Amount Math
//!
//! Sign-aware big-integer amount handling. Ledger amounts arrive as
//! decimal strings with a declared precision; chain amounts arrive as raw
//! integers in the token's smallest unit. Comparison always happens after
//! rescaling both sides to the larger decimal basis.

use crate::errors::AmountError;
use primitive_types::U256;

/// A parsed amount: magnitude in a fixed decimal basis plus sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaledAmount {
    /// True for negative amounts. Zero is never negative.
    pub negative: bool,
    /// Magnitude in the smallest unit of its basis.
    pub raw: U256,
}

impl ScaledAmount {
    fn new(negative: bool, raw: U256) -> Self {
        Self {
            negative: negative && !raw.is_zero(),
            raw,
        }
    }

    /// Rescale from `from_decimals` to `to_decimals` (must not shrink).
    pub fn rescale(self, from_decimals: u32, to_decimals: u32) -> Result<Self, AmountError> {
        debug_assert!(to_decimals >= from_decimals);
        let factor = pow10(to_decimals - from_decimals)?;
        let raw = self
            .raw
            .checked_mul(factor)
            .ok_or(AmountError::Overflow {
                value: self.raw.to_string(),
                decimals: to_decimals,
            })?;
        Ok(Self::new(self.negative, raw))
    }
}

fn pow10(exp: u32) -> Result<U256, AmountError> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(AmountError::Overflow {
            value: format!("10^{exp}"),
            decimals: exp,
        })
}

/// Parse a decimal-string amount (`"-1.50"`) into the smallest unit of
/// `decimals` (`-150` at 2 decimals).
pub fn parse_decimal(value: &str, decimals: u32) -> Result<ScaledAmount, AmountError> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() {
        return Err(AmountError::InvalidDecimal {
            value: value.to_string(),
        });
    }

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::InvalidDecimal {
            value: value.to_string(),
        });
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AmountError::InvalidDecimal {
            value: value.to_string(),
        });
    }
    if frac_part.len() as u32 > decimals {
        return Err(AmountError::PrecisionExceeded {
            value: value.to_string(),
            decimals,
        });
    }

    let int_value = if int_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(int_part).map_err(|_| AmountError::Overflow {
            value: value.to_string(),
            decimals,
        })?
    };
    let frac_scaled = if frac_part.is_empty() {
        U256::zero()
    } else {
        let frac_value = U256::from_dec_str(frac_part).map_err(|_| AmountError::Overflow {
            value: value.to_string(),
            decimals,
        })?;
        let padding = pow10(decimals - frac_part.len() as u32)?;
        frac_value.checked_mul(padding).ok_or(AmountError::Overflow {
            value: value.to_string(),
            decimals,
        })?
    };

    let raw = int_value
        .checked_mul(pow10(decimals)?)
        .and_then(|scaled| scaled.checked_add(frac_scaled))
        .ok_or(AmountError::Overflow {
            value: value.to_string(),
            decimals,
        })?;
    Ok(ScaledAmount::new(negative, raw))
}

/// Parse a raw integer amount already in the token's smallest unit.
pub fn parse_raw(value: &str) -> Result<ScaledAmount, AmountError> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::InvalidInteger {
            value: value.to_string(),
        });
    }
    let raw = U256::from_dec_str(digits).map_err(|_| AmountError::InvalidInteger {
        value: value.to_string(),
    })?;
    Ok(ScaledAmount::new(negative, raw))
}

/// Compare two amounts carried at different decimal precisions.
pub fn amounts_equal(
    a: ScaledAmount,
    a_decimals: u32,
    b: ScaledAmount,
    b_decimals: u32,
) -> Result<bool, AmountError> {
    let common = a_decimals.max(b_decimals);
    let a = a.rescale(a_decimals, common)?;
    let b = b.rescale(b_decimals, common)?;
    Ok(a == b)
}

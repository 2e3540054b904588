//! Conversion between human decimal strings and the `i128` fixed-point
//! representation used by the token contracts (7 fractional digits).

use crate::consts::TOKEN_DECIMALS;
use thiserror::Error;

/// A decimal quantity scaled by 10^7.
pub type FixedPointAmount = i128;

const SCALE: i128 = 10_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount '{0}' contains more than one decimal point")]
    MultipleDecimalPoints(String),

    #[error("amount '{0}' contains a non-digit character")]
    InvalidCharacter(String),

    #[error("amount '{0}' has no digits")]
    NoDigits(String),

    #[error("amount '{0}' does not fit in a 128-bit fixed-point value")]
    Overflow(String),
}

/// Parse a decimal string into its fixed-point value.
///
/// Empty input is zero. Fractional digits beyond the seventh are dropped,
/// not rounded. A single leading `-` negates the whole magnitude.
pub fn to_fixed_point(amount: &str) -> Result<FixedPointAmount, AmountError> {
    if amount.is_empty() {
        return Ok(0);
    }

    let (negative, magnitude) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };

    let mut parts = magnitude.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(AmountError::MultipleDecimalPoints(amount.to_string()));
    }

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::NoDigits(amount.to_string()));
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidCharacter(amount.to_string()));
    }

    let mut fraction_padded: String = fraction.chars().take(TOKEN_DECIMALS).collect();
    while fraction_padded.len() < TOKEN_DECIMALS {
        fraction_padded.push('0');
    }

    let overflow = || AmountError::Overflow(amount.to_string());
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole.parse::<i128>().map_err(|_| overflow())?
    };
    let fraction_value = fraction_padded.parse::<i128>().map_err(|_| overflow())?;

    let value = whole_value
        .checked_mul(SCALE)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(overflow)?;

    Ok(if negative { -value } else { value })
}

/// Render a fixed-point value as its canonical decimal string: trailing
/// fractional zeros are stripped and the point is omitted for whole values.
pub fn from_fixed_point(value: FixedPointAmount) -> String {
    let digits = value.unsigned_abs().to_string();
    let padded = format!("{:0>width$}", digits, width = TOKEN_DECIMALS + 1);

    let (integer, fraction) = padded.split_at(padded.len() - TOKEN_DECIMALS);
    let fraction = fraction.trim_end_matches('0');

    let formatted = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    };

    if value < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

//! Input checks applied at the request boundary, before any network call.

use crate::error::{Error, Result};
use common::account::{AccountLabel, TransferDestination};
use common::consts::TOKEN_DECIMALS;
use serde_json::Value;

const MAX_WHOLE_AMOUNT: u128 = 1_000_000_000_000_000;

pub fn parse_account_label(value: &str, field: &str) -> Result<AccountLabel> {
    value.parse().map_err(|_| {
        Error::Validation(format!(
            "{} must be one of: A, B, C, D. Received: {}",
            field, value
        ))
    })
}

/// Like [`parse_account_label`], also accepting the treasury pseudo-label.
pub fn parse_destination(value: &str, field: &str) -> Result<TransferDestination> {
    value.parse().map_err(|_| {
        Error::Validation(format!(
            "{} must be one of: A, B, C, D, MULTISIG. Received: {}",
            field, value
        ))
    })
}

/// A positive plain decimal (`"1.5"`, `"100"`) of at most 10^15 with no
/// more than seven fractional digits.
pub fn validate_amount(amount: &str) -> Result<&str> {
    if amount.trim().is_empty() {
        return Err(Error::Validation("Amount cannot be empty".to_string()));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (amount, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return Err(Error::Validation(
            "Amount must be a valid positive number (e.g., '1.5', '100', '0.01')".to_string(),
        ));
    }

    let fraction = fraction.unwrap_or("");
    if whole.bytes().chain(fraction.bytes()).all(|b| b == b'0') {
        return Err(Error::Validation(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let whole_value = whole.trim_start_matches('0');
    let fraction_nonzero = fraction.bytes().any(|b| b != b'0');
    let too_large = match whole_value.parse::<u128>() {
        Ok(value) => value > MAX_WHOLE_AMOUNT || (value == MAX_WHOLE_AMOUNT && fraction_nonzero),
        Err(_) => !whole_value.is_empty(),
    };
    if too_large {
        return Err(Error::Validation("Amount is too large".to_string()));
    }

    if fraction.len() > TOKEN_DECIMALS {
        return Err(Error::Validation(
            "Amount cannot have more than 7 decimal places".to_string(),
        ));
    }

    Ok(amount)
}

pub fn validate_different_accounts(from: AccountLabel, to: TransferDestination) -> Result<()> {
    if to == TransferDestination::Account(from) {
        return Err(Error::Validation(
            "Source and destination accounts must be different".to_string(),
        ));
    }
    Ok(())
}

/// Request ids arrive as JSON numbers and must fit the contract's `u32`.
/// A float with no fractional part (`3.0`) counts as an integer.
pub fn validate_request_id(value: &Value) -> Result<u32> {
    let integral = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
            .map(|f| f as u64)
    });
    integral
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| Error::Validation("requestId must be a non-negative integer".to_string()))
}

/// Check an `Authorization: Bearer <token>` header against the admin token.
pub fn validate_admin_token(header: Option<&str>, expected: &str) -> Result<()> {
    if expected.is_empty() {
        return Err(Error::Configuration(
            "ADMIN_AUTH_TOKEN is not configured".to_string(),
        ));
    }

    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| Error::Unauthorized("Authorization header is required".to_string()))?;

    let token = match header.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => token,
        _ => {
            return Err(Error::Unauthorized(
                "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            ));
        }
    };

    if !constant_time_eq(token.as_bytes(), expected.as_bytes()) {
        return Err(Error::Unauthorized(
            "Invalid authorization token".to_string(),
        ));
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! Typed contract-call arguments.

use crate::error::{Error, Result};
use stellar_strkey::Strkey;
use stellar_xdr::curr as xdr;

/// Parse a `C...` contract or `G...` account strkey into an `ScAddress`.
pub fn sc_address(address: &str) -> Result<xdr::ScAddress> {
    match Strkey::from_string(address) {
        Ok(Strkey::Contract(contract)) => Ok(xdr::ScAddress::Contract(xdr::Hash(contract.0))),
        Ok(Strkey::PublicKeyEd25519(key)) => Ok(xdr::ScAddress::Account(xdr::AccountId(
            xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(key.0)),
        ))),
        _ => Err(Error::InvalidAddress(address.to_string())),
    }
}

/// Render an `ScAddress` back to its strkey.
pub fn address_to_string(address: &xdr::ScAddress) -> String {
    match address {
        xdr::ScAddress::Contract(xdr::Hash(bytes)) => stellar_strkey::Contract(*bytes).to_string(),
        xdr::ScAddress::Account(xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(
            xdr::Uint256(bytes),
        ))) => stellar_strkey::ed25519::PublicKey(*bytes).to_string(),
    }
}

pub fn address(address: &str) -> Result<xdr::ScVal> {
    Ok(xdr::ScVal::Address(sc_address(address)?))
}

pub fn i128(value: i128) -> xdr::ScVal {
    xdr::ScVal::I128(xdr::Int128Parts {
        hi: (value >> 64) as i64,
        lo: value as u64,
    })
}

pub fn u64(value: u64) -> xdr::ScVal {
    xdr::ScVal::U64(value)
}

pub fn u32(value: u32) -> xdr::ScVal {
    xdr::ScVal::U32(value)
}

pub fn bool(value: bool) -> xdr::ScVal {
    xdr::ScVal::Bool(value)
}

pub fn i128_from_parts(parts: &xdr::Int128Parts) -> i128 {
    ((parts.hi as i128) << 64) | parts.lo as i128
}

pub fn u128_from_parts(parts: &xdr::UInt128Parts) -> u128 {
    ((parts.hi as u128) << 64) | parts.lo as u128
}

/// Read an integer return value, as produced by token `balance` calls.
pub fn to_i128(value: &xdr::ScVal) -> Option<i128> {
    match value {
        xdr::ScVal::I128(parts) => Some(i128_from_parts(parts)),
        xdr::ScVal::U128(parts) => i128::try_from(u128_from_parts(parts)).ok(),
        xdr::ScVal::I64(v) => Some(*v as i128),
        xdr::ScVal::U64(v) => Some(*v as i128),
        xdr::ScVal::I32(v) => Some(*v as i128),
        xdr::ScVal::U32(v) => Some(*v as i128),
        _ => None,
    }
}

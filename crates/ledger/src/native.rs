//! Plain values decoded from contract return data.
//!
//! Contract results arrive as `ScVal`, but snapshot readers also accept
//! JSON documents, so both decode into the same `Native` tree.

use crate::scval;
use std::collections::BTreeMap;
use stellar_xdr::curr as xdr;

#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Void,
    Bool(bool),
    Int(i128),
    Str(String),
    Bytes(Vec<u8>),
    Address(String),
    List(Vec<Native>),
    /// Ordered key/value pairs, as produced by an `ScMap`.
    Map(Vec<(Native, Native)>),
    /// String-keyed object, as produced by a JSON document.
    Object(BTreeMap<String, Native>),
}

impl Native {
    /// Text form of a scalar value. Composite values have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Native::Str(s) | Native::Address(s) => Some(s.clone()),
            Native::Int(v) => Some(v.to_string()),
            Native::Bool(b) => Some(b.to_string()),
            Native::Bytes(bytes) => match String::from_utf8(bytes.clone()) {
                Ok(s) => Some(s),
                Err(_) => Some(hex::encode(bytes)),
            },
            Native::Void | Native::List(_) | Native::Map(_) | Native::Object(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Native::Int(v) => Some(*v),
            Native::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&xdr::ScVal> for Native {
    fn from(value: &xdr::ScVal) -> Self {
        match value {
            xdr::ScVal::Void => Native::Void,
            xdr::ScVal::Bool(b) => Native::Bool(*b),
            xdr::ScVal::U32(v) => Native::Int(*v as i128),
            xdr::ScVal::I32(v) => Native::Int(*v as i128),
            xdr::ScVal::U64(v) => Native::Int(*v as i128),
            xdr::ScVal::I64(v) => Native::Int(*v as i128),
            xdr::ScVal::Timepoint(xdr::TimePoint(v)) => Native::Int(*v as i128),
            xdr::ScVal::Duration(xdr::Duration(v)) => Native::Int(*v as i128),
            xdr::ScVal::I128(parts) => Native::Int(scval::i128_from_parts(parts)),
            xdr::ScVal::U128(parts) => {
                let value = scval::u128_from_parts(parts);
                i128::try_from(value)
                    .map(Native::Int)
                    .unwrap_or_else(|_| Native::Str(value.to_string()))
            }
            xdr::ScVal::Bytes(xdr::ScBytes(bytes)) => Native::Bytes(bytes.to_vec()),
            xdr::ScVal::String(xdr::ScString(s)) => Native::Str(s.to_utf8_string_lossy()),
            xdr::ScVal::Symbol(xdr::ScSymbol(s)) => Native::Str(s.to_utf8_string_lossy()),
            xdr::ScVal::Address(address) => Native::Address(scval::address_to_string(address)),
            xdr::ScVal::Vec(Some(xdr::ScVec(items))) => {
                Native::List(items.iter().map(Native::from).collect())
            }
            xdr::ScVal::Vec(None) => Native::List(Vec::new()),
            xdr::ScVal::Map(Some(xdr::ScMap(entries))) => Native::Map(
                entries
                    .iter()
                    .map(|entry| (Native::from(&entry.key), Native::from(&entry.val)))
                    .collect(),
            ),
            xdr::ScVal::Map(None) => Native::Map(Vec::new()),
            _ => Native::Void,
        }
    }
}

impl From<serde_json::Value> for Native {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Native::Void,
            serde_json::Value::Bool(b) => Native::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Native::Int(v as i128),
                None => match n.as_u64() {
                    Some(v) => Native::Int(v as i128),
                    None => Native::Str(n.to_string()),
                },
            },
            serde_json::Value::String(s) => Native::Str(s),
            serde_json::Value::Array(items) => {
                Native::List(items.into_iter().map(Native::from).collect())
            }
            serde_json::Value::Object(map) => Native::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Native::from(value)))
                    .collect(),
            ),
        }
    }
}

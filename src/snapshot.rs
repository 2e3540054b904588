//! Decoding of treasury withdrawal snapshots.
//!
//! Depending on the contract SDK and RPC version, `list_requests` entries
//! arrive as positional tuples, as `ScMap`s, or as keyed JSON objects. Each
//! shape is normalized into one field map which then goes through a single
//! decode path. Records referencing addresses outside the directory are
//! dropped whole.

use crate::directory::AccountDirectory;
use common::account::AccountLabel;
use common::amount::from_fixed_point;
use common::consts::SNAPSHOT_FIELDS;
use common::multisig::MultisigRequestRecord;
use ledger::native::Native;
use std::collections::BTreeMap;

pub type Fields = BTreeMap<String, Native>;

/// One raw `list_requests` entry, tagged by its wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSnapshot {
    Tuple(Vec<Native>),
    Map(Vec<(Native, Native)>),
    Object(BTreeMap<String, Native>),
}

impl RawSnapshot {
    /// Scalars are not snapshots.
    pub fn detect(value: Native) -> Option<RawSnapshot> {
        match value {
            Native::List(items) => Some(RawSnapshot::Tuple(items)),
            Native::Map(entries) => Some(RawSnapshot::Map(entries)),
            Native::Object(fields) => Some(RawSnapshot::Object(fields)),
            _ => None,
        }
    }

    pub fn normalize(self) -> Fields {
        match self {
            RawSnapshot::Tuple(items) => normalize_tuple(items),
            RawSnapshot::Map(entries) => normalize_map(entries),
            RawSnapshot::Object(fields) => fields,
        }
    }
}

/// Positional fields are named by index; extra trailing items are ignored.
pub fn normalize_tuple(items: Vec<Native>) -> Fields {
    SNAPSHOT_FIELDS
        .iter()
        .zip(items)
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Entries whose key has no text form are skipped.
pub fn normalize_map(entries: Vec<(Native, Native)>) -> Fields {
    entries
        .into_iter()
        .filter_map(|(key, value)| key.as_text().map(|key| (key, value)))
        .collect()
}

/// Decode a whole `list_requests` result, latest request first.
pub fn decode_requests(value: Native, directory: &AccountDirectory) -> Vec<MultisigRequestRecord> {
    let entries = match value {
        Native::List(entries) => entries,
        Native::Void => Vec::new(),
        other => {
            log::warn!("list_requests returned a non-list value: {:?}", other);
            Vec::new()
        }
    };

    let mut records: Vec<MultisigRequestRecord> = entries
        .into_iter()
        .filter_map(|entry| {
            let raw = RawSnapshot::detect(entry)?;
            decode(raw.normalize(), directory)
        })
        .collect();

    records.sort_by(|a, b| b.id.cmp(&a.id));
    records
}

pub fn decode(fields: Fields, directory: &AccountDirectory) -> Option<MultisigRequestRecord> {
    let id = int_field(&fields, &["id"]).and_then(|v| u32::try_from(v).ok()).unwrap_or(0);

    let to = label_field(&fields, "to", directory);
    let initiator = label_field(&fields, "initiator", directory);
    let (Some(to), Some(initiator)) = (to, initiator) else {
        log::debug!("Dropping request {}: unknown recipient or initiator", id);
        return None;
    };

    let amount = match fields.get("amount") {
        Some(value) => value
            .as_int()
            .map(from_fixed_point)
            .unwrap_or_else(|| "0".to_string()),
        None => "0".to_string(),
    };

    let created_at = int_field(&fields, &["created_at", "createdAt"])
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0);
    let completed_at = int_field(&fields, &["completed_at", "completedAt"])
        .and_then(|v| u64::try_from(v).ok())
        .filter(|v| *v != 0);

    Some(MultisigRequestRecord {
        id,
        to,
        amount,
        approvals: approvals(fields.get("approvals"), directory),
        executed: fields.get("executed").map(truthy).unwrap_or(false),
        initiator,
        created_at,
        completed_at,
    })
}

fn int_field(fields: &Fields, names: &[&str]) -> Option<i128> {
    names
        .iter()
        .find_map(|name| fields.get(*name))
        .and_then(Native::as_int)
}

fn label_field(fields: &Fields, name: &str, directory: &AccountDirectory) -> Option<AccountLabel> {
    fields
        .get(name)
        .and_then(stringify)
        .and_then(|address| directory.label_of(&address))
}

/// Unresolvable signers are dropped; duplicates keep their first position.
fn approvals(value: Option<&Native>, directory: &AccountDirectory) -> Vec<AccountLabel> {
    let Some(Native::List(items)) = value else {
        return Vec::new();
    };

    let mut labels = Vec::with_capacity(items.len());
    for label in items
        .iter()
        .filter_map(stringify)
        .filter_map(|address| directory.label_of(&address))
    {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Text form of an address-like field. A single-field object such as
/// `{"address": "C..."}` stringifies to its only value.
fn stringify(value: &Native) -> Option<String> {
    match value {
        Native::Object(fields) if fields.len() == 1 => fields.values().next().and_then(stringify),
        Native::Map(entries) if entries.len() == 1 => stringify(&entries[0].1),
        other => other.as_text(),
    }
}

fn truthy(value: &Native) -> bool {
    match value {
        Native::Bool(b) => *b,
        Native::Int(v) => *v != 0,
        Native::Str(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use common::account::AccountLabel::{A, B, C};
    use ledger::xdr;
    use serde_json::json;

    fn addr(label: AccountLabel) -> Native {
        Native::Address(testing::account(label))
    }

    fn text(s: &str) -> Native {
        Native::Str(s.to_string())
    }

    fn expected() -> MultisigRequestRecord {
        MultisigRequestRecord {
            id: 7,
            to: B,
            amount: "12.5".to_string(),
            approvals: vec![A, C],
            executed: false,
            initiator: A,
            created_at: 1_700_000_000,
            completed_at: None,
        }
    }

    fn tuple() -> Native {
        Native::List(vec![
            Native::Int(7),
            addr(B),
            Native::Int(125_000_000),
            Native::List(vec![addr(A), addr(C), addr(A)]),
            Native::Bool(false),
            addr(A),
            Native::Int(1_700_000_000),
            Native::Int(0),
        ])
    }

    fn sc_map() -> Native {
        let entry = |key: &str, val: xdr::ScVal| xdr::ScMapEntry {
            key: xdr::ScVal::Symbol(xdr::ScSymbol(key.to_string().try_into().unwrap())),
            val,
        };
        let string = |s: String| xdr::ScVal::String(xdr::ScString(s.try_into().unwrap()));
        let approvals = xdr::ScVal::Vec(Some(xdr::ScVec(
            vec![
                string(testing::account(A)),
                string(testing::account(C)),
                string(testing::account(A)),
            ]
            .try_into()
            .unwrap(),
        )));

        let map = xdr::ScVal::Map(Some(xdr::ScMap(
            vec![
                entry("amount", ledger::scval::i128(125_000_000)),
                entry("approvals", approvals),
                entry("completed_at", xdr::ScVal::U64(0)),
                entry("created_at", xdr::ScVal::U64(1_700_000_000)),
                entry("executed", xdr::ScVal::Bool(false)),
                entry("id", xdr::ScVal::U32(7)),
                entry("initiator", string(testing::account(A))),
                entry("to", string(testing::account(B))),
            ]
            .try_into()
            .unwrap(),
        )));
        Native::from(&map)
    }

    fn object() -> Native {
        Native::from(json!({
            "id": 7,
            "to": testing::account(B),
            "amount": "125000000",
            "approvals": [testing::account(A), testing::account(C), testing::account(A)],
            "executed": false,
            "initiator": {"address": testing::account(A)},
            "createdAt": 1_700_000_000u64
        }))
    }

    #[test]
    fn test_all_shapes_decode_identically() {
        let directory = testing::directory();
        for value in [tuple(), sc_map(), object()] {
            let raw = RawSnapshot::detect(value).unwrap();
            assert_eq!(decode(raw.normalize(), &directory), Some(expected()));
        }
    }

    #[test]
    fn test_unknown_recipient_drops_record() {
        let directory = testing::directory();
        let mut fields = RawSnapshot::detect(tuple()).unwrap().normalize();
        fields.insert("to".to_string(), Native::Address(testing::contract(200)));
        assert_eq!(decode(fields, &directory), None);

        let mut fields = RawSnapshot::detect(tuple()).unwrap().normalize();
        fields.remove("initiator");
        assert_eq!(decode(fields, &directory), None);
    }

    #[test]
    fn test_unknown_approvals_are_dropped() {
        let directory = testing::directory();
        let mut fields = RawSnapshot::detect(tuple()).unwrap().normalize();
        fields.insert(
            "approvals".to_string(),
            Native::List(vec![
                Native::Address(testing::contract(200)),
                addr(C),
                Native::Void,
                addr(C),
            ]),
        );
        assert_eq!(decode(fields, &directory).unwrap().approvals, vec![C]);
    }

    #[test]
    fn test_fallbacks() {
        let directory = testing::directory();
        let fields: Fields = [
            ("to".to_string(), addr(B)),
            ("initiator".to_string(), addr(A)),
            ("amount".to_string(), text("not a number")),
            ("completed_at".to_string(), Native::Int(1_700_000_500)),
        ]
        .into_iter()
        .collect();

        let record = decode(fields, &directory).unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(record.amount, "0");
        assert_eq!(record.created_at, 0);
        assert_eq!(record.completed_at, Some(1_700_000_500));
        assert!(record.approvals.is_empty());
        assert!(!record.executed);
    }

    #[test]
    fn test_decode_requests_sorts_latest_first() {
        let directory = testing::directory();
        let entry = |id: i128| {
            Native::List(vec![
                Native::Int(id),
                addr(B),
                Native::Int(10_000_000),
                Native::List(vec![]),
                Native::Bool(false),
                addr(A),
                Native::Int(0),
                Native::Int(0),
            ])
        };
        let value = Native::List(vec![
            entry(2),
            entry(9),
            Native::Int(5),
            entry(0),
            entry(4),
        ]);

        let ids: Vec<u32> = decode_requests(value, &directory)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![9, 4, 2, 0]);
    }

    #[test]
    fn test_non_list_result_is_empty() {
        let directory = testing::directory();
        assert!(decode_requests(Native::Void, &directory).is_empty());
        assert!(decode_requests(Native::Int(3), &directory).is_empty());
    }
}

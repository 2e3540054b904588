use crate::consts::MULTISIG_PSEUDO_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pre-provisioned smart account participating in transfers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountLabel {
    A,
    B,
    C,
    D,
}

impl AccountLabel {
    pub const ALL: [AccountLabel; 4] = [
        AccountLabel::A,
        AccountLabel::B,
        AccountLabel::C,
        AccountLabel::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountLabel::A => "A",
            AccountLabel::B => "B",
            AccountLabel::C => "C",
            AccountLabel::D => "D",
        }
    }
}

impl fmt::Display for AccountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown account label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for AccountLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AccountLabel::A),
            "B" => Ok(AccountLabel::B),
            "C" => Ok(AccountLabel::C),
            "D" => Ok(AccountLabel::D),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Recipient of a transfer: one of the domain accounts or the shared treasury.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum TransferDestination {
    Account(AccountLabel),
    Multisig,
}

impl fmt::Display for TransferDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDestination::Account(label) => label.fmt(f),
            TransferDestination::Multisig => f.write_str(MULTISIG_PSEUDO_LABEL),
        }
    }
}

impl FromStr for TransferDestination {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == MULTISIG_PSEUDO_LABEL {
            return Ok(TransferDestination::Multisig);
        }
        s.parse().map(TransferDestination::Account)
    }
}

impl TryFrom<String> for TransferDestination {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransferDestination> for String {
    fn from(value: TransferDestination) -> Self {
        value.to_string()
    }
}

impl From<AccountLabel> for TransferDestination {
    fn from(label: AccountLabel) -> Self {
        TransferDestination::Account(label)
    }
}

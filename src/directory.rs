use crate::error::{Error, Result};
use common::account::{AccountLabel, TransferDestination};
use std::collections::BTreeMap;

/// Label to contract address mapping, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: BTreeMap<AccountLabel, String>,
    multisig: Option<String>,
}

impl AccountDirectory {
    /// Empty addresses are treated as unconfigured.
    pub fn new(accounts: BTreeMap<AccountLabel, String>, multisig: Option<String>) -> Self {
        AccountDirectory {
            accounts: accounts
                .into_iter()
                .filter(|(_, address)| !address.trim().is_empty())
                .collect(),
            multisig: multisig.filter(|address| !address.trim().is_empty()),
        }
    }

    pub fn address_of(&self, label: AccountLabel) -> Result<&str> {
        self.accounts
            .get(&label)
            .map(String::as_str)
            .ok_or_else(|| Error::Validation(format!("Missing contract ID for account {}", label)))
    }

    /// Reverse lookup used when decoding snapshots. Unknown addresses are
    /// not an error: snapshots may reference contracts outside the directory.
    pub fn label_of(&self, address: &str) -> Option<AccountLabel> {
        let address = address.trim();
        self.accounts
            .iter()
            .find(|(_, known)| known.as_str() == address)
            .map(|(label, _)| *label)
    }

    pub fn resolve_destination(&self, destination: TransferDestination) -> Result<&str> {
        match destination {
            TransferDestination::Account(label) => self.address_of(label),
            TransferDestination::Multisig => self.multisig_address(),
        }
    }

    pub fn multisig_address(&self) -> Result<&str> {
        self.multisig
            .as_deref()
            .ok_or_else(|| Error::Validation("Multisig contract ID is not configured".to_string()))
    }

    pub fn labels(&self) -> impl Iterator<Item = AccountLabel> + '_ {
        self.accounts.keys().copied()
    }
}

use crate::account::AccountLabel;
use serde::{Deserialize, Serialize};

/// One withdrawal request held by the treasury contract, expressed in
/// domain labels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MultisigRequestRecord {
    pub id: u32,
    pub to: AccountLabel,
    pub amount: String,
    pub approvals: Vec<AccountLabel>,
    pub executed: bool,
    pub initiator: AccountLabel,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    #[serde(rename = "completedAt", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MultisigState {
    pub balance: String,
    pub label: String,
    pub threshold: u32,
    pub signers: Vec<AccountLabel>,
    pub requests: Vec<MultisigRequestRecord>,
}

/// Result of the treasury's `get_summary` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MultisigSummary {
    pub threshold: u32,
    #[serde(rename = "signerCount")]
    pub signer_count: u32,
    pub label: String,
}

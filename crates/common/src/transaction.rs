use serde::{Deserialize, Serialize};

/// An accepted submission, identified by its network hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub hash: String,
    #[serde(rename = "explorerUrl")]
    pub explorer_url: String,
}

impl TransactionResult {
    pub fn new(hash: String, explorer_base_url: &str) -> Self {
        let explorer_url = format!("{}{}", explorer_base_url, hash);
        TransactionResult { hash, explorer_url }
    }
}

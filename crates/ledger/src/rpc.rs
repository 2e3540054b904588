//! JSON-RPC 2.0 envelopes and the Soroban RPC result shapes this crate reads.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Request<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

#[derive(Deserialize, Debug)]
pub struct Response<R> {
    pub result: Option<R>,
    pub error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct GetLedgerEntriesParams {
    pub keys: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct GetLedgerEntriesResult {
    #[serde(default)]
    pub entries: Option<Vec<LedgerEntryResult>>,
    #[serde(rename = "latestLedger", default)]
    pub latest_ledger: u32,
}

#[derive(Deserialize, Debug)]
pub struct LedgerEntryResult {
    pub key: String,
    pub xdr: String,
    #[serde(rename = "lastModifiedLedgerSeq", default)]
    pub last_modified_ledger_seq: u32,
}

#[derive(Serialize, Debug)]
pub struct TransactionParams {
    pub transaction: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SimulateTransactionResult {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "transactionData", default)]
    pub transaction_data: Option<String>,
    #[serde(rename = "minResourceFee", default)]
    pub min_resource_fee: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<SimulateHostFunctionResult>>,
    #[serde(rename = "latestLedger", default)]
    pub latest_ledger: u32,
}

#[derive(Deserialize, Debug, Default)]
pub struct SimulateHostFunctionResult {
    #[serde(default)]
    pub auth: Option<Vec<String>>,
    #[serde(default)]
    pub xdr: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SendTransactionResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(rename = "errorResultXdr", default)]
    pub error_result_xdr: Option<String>,
    #[serde(rename = "latestLedger", default)]
    pub latest_ledger: u32,
}

use crate::error::{Error, Result};
use crate::keypair::Keypair;
use crate::rpc;
use crate::submit::{self, SubmitResponse};
use crate::transaction::Transaction;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use stellar_xdr::curr::{self as xdr, Limits, ReadXdr, WriteXdr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSequence {
    pub account_id: String,
    pub sequence: i64,
}

/// Outcome of a successful simulation.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    /// Return value of the invoked contract function.
    pub result: Option<xdr::ScVal>,
    pub auth: Vec<xdr::SorobanAuthorizationEntry>,
    pub transaction_data: Option<xdr::SorobanTransactionData>,
    pub min_resource_fee: i64,
    pub latest_ledger: u32,
}

/// The single point of contact with the ledger.
///
/// Implementations hold one signing credential and one network passphrase,
/// both fixed at construction.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Public key of the credential every transaction is signed with.
    fn admin_public_key(&self) -> &str;

    async fn get_account_sequence(&self, public_key: &str) -> Result<AccountSequence>;

    /// Read-only simulation; never submits.
    async fn simulate_transaction(&self, tx: &Transaction) -> Result<Simulation>;

    /// Simulate and attach resource data, auth entries and the resource fee.
    async fn prepare_transaction(&self, tx: Transaction) -> Result<Transaction>;

    fn sign_transaction(&self, tx: Transaction) -> Result<Transaction>;

    async fn submit_transaction(&self, tx: &Transaction) -> Result<SubmitResponse>;
}

pub struct RpcClient {
    http: reqwest::Client,
    rpc_url: String,
    keypair: Keypair,
    network_passphrase: String,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(
        rpc_url: impl Into<String>,
        keypair: Keypair,
        network_passphrase: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(RpcClient {
            http,
            rpc_url: rpc_url.into(),
            keypair,
            network_passphrase: network_passphrase.into(),
            request_id: AtomicU64::new(1),
        })
    }

    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = rpc::Request {
            jsonrpc: "2.0",
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        log::debug!("RPC {} -> {}", method, self.rpc_url);

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to reach RPC endpoint: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read {} response: {}", method, e)))?;

        if !status.is_success() {
            return Err(Error::Network(format!(
                "{} request failed [{}]: {}",
                method, status, body
            )));
        }

        let parsed: rpc::Response<R> = serde_json::from_str(&body)
            .map_err(|e| Error::Network(format!("Failed to parse {} response: {}", method, e)))?;

        if let Some(error) = parsed.error {
            return Err(Error::Network(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }

        parsed
            .result
            .ok_or_else(|| Error::Network(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl NetworkClient for RpcClient {
    fn admin_public_key(&self) -> &str {
        self.keypair.public_key()
    }

    async fn get_account_sequence(&self, public_key: &str) -> Result<AccountSequence> {
        let key = stellar_strkey::ed25519::PublicKey::from_string(public_key)
            .map_err(|_| Error::InvalidAddress(public_key.to_string()))?;
        let ledger_key = xdr::LedgerKey::Account(xdr::LedgerKeyAccount {
            account_id: xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(xdr::Uint256(key.0))),
        });

        let result: rpc::GetLedgerEntriesResult = self
            .call(
                "getLedgerEntries",
                rpc::GetLedgerEntriesParams {
                    keys: vec![ledger_key.to_xdr_base64(Limits::none())?],
                },
            )
            .await
            .map_err(|e| with_context(e, &format!("Failed to fetch account {}", public_key)))?;

        let entry = result
            .entries
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| Error::Network(format!("Account {} not found", public_key)))?;

        match xdr::LedgerEntryData::from_xdr_base64(&entry.xdr, Limits::none())? {
            xdr::LedgerEntryData::Account(account) => Ok(AccountSequence {
                account_id: public_key.to_string(),
                sequence: account.seq_num.0,
            }),
            _ => Err(Error::Network(format!(
                "Ledger entry for {} is not an account",
                public_key
            ))),
        }
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> Result<Simulation> {
        let result: rpc::SimulateTransactionResult = self
            .call(
                "simulateTransaction",
                rpc::TransactionParams {
                    transaction: tx.to_envelope_base64()?,
                },
            )
            .await
            .map_err(|e| with_context(e, "Failed to simulate transaction"))?;

        parse_simulation(result)
    }

    async fn prepare_transaction(&self, tx: Transaction) -> Result<Transaction> {
        let simulation = self
            .simulate_transaction(&tx)
            .await
            .map_err(|e| with_context(e, "Failed to prepare transaction"))?;
        assemble(tx, simulation)
    }

    fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction> {
        let hash = tx.hash(&self.network_passphrase)?;
        tx.signatures.push(self.keypair.sign_decorated(&hash)?);
        Ok(tx)
    }

    async fn submit_transaction(&self, tx: &Transaction) -> Result<SubmitResponse> {
        log::debug!(
            "Submitting {} on {} (sequence {})",
            tx.call.function,
            tx.call.contract_id,
            tx.sequence
        );
        let response: rpc::SendTransactionResult = self
            .call(
                "sendTransaction",
                rpc::TransactionParams {
                    transaction: tx.to_envelope_base64()?,
                },
            )
            .await
            .map_err(|e| with_context(e, "Failed to send transaction"))?;

        submit::interpret(response)
    }
}

fn with_context(err: Error, context: &str) -> Error {
    match err {
        Error::Network(message) => Error::Network(format!("{}: {}", context, message)),
        other => other,
    }
}

/// Decode a raw simulation result. A result carrying `error` is a failure.
pub fn parse_simulation(result: rpc::SimulateTransactionResult) -> Result<Simulation> {
    if let Some(error) = result.error {
        return Err(Error::Network(format!("Simulation failed: {}", error)));
    }

    let transaction_data = match result.transaction_data.as_deref() {
        Some(data) if !data.is_empty() => Some(xdr::SorobanTransactionData::from_xdr_base64(
            data,
            Limits::none(),
        )?),
        _ => None,
    };

    let min_resource_fee = match result.min_resource_fee.as_deref() {
        Some(fee) => fee
            .parse::<i64>()
            .map_err(|_| Error::Network(format!("Invalid minResourceFee '{}'", fee)))?,
        None => 0,
    };

    let (value, auth) = match result.results.unwrap_or_default().into_iter().next() {
        Some(host) => {
            let value = if host.xdr.is_empty() {
                None
            } else {
                Some(xdr::ScVal::from_xdr_base64(&host.xdr, Limits::none())?)
            };
            let auth = host
                .auth
                .unwrap_or_default()
                .iter()
                .map(|entry| xdr::SorobanAuthorizationEntry::from_xdr_base64(entry, Limits::none()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            (value, auth)
        }
        None => (None, Vec::new()),
    };

    Ok(Simulation {
        result: value,
        auth,
        transaction_data,
        min_resource_fee,
        latest_ledger: result.latest_ledger,
    })
}

/// Attach simulation output to a transaction so it can be signed.
pub fn assemble(mut tx: Transaction, simulation: Simulation) -> Result<Transaction> {
    let data = simulation
        .transaction_data
        .ok_or_else(|| Error::Network("Simulation returned no transaction data".to_string()))?;

    let resource_fee = u32::try_from(simulation.min_resource_fee.max(0)).map_err(|_| {
        Error::Network(format!(
            "Resource fee {} exceeds the transaction fee limit",
            simulation.min_resource_fee
        ))
    })?;
    tx.fee = tx.fee.checked_add(resource_fee).ok_or_else(|| {
        Error::Network(format!(
            "Fee {} + {} exceeds the transaction fee limit",
            tx.fee, resource_fee
        ))
    })?;

    if tx.auth.is_empty() {
        tx.auth = simulation.auth;
    }
    tx.soroban_data = Some(data);
    Ok(tx)
}

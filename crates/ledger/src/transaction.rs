use crate::client::AccountSequence;
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{self as xdr, Limits, WriteXdr};

/// A single contract function invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub contract_id: String,
    pub function: String,
    pub args: Vec<xdr::ScVal>,
}

impl ContractCall {
    pub fn new(contract_id: impl Into<String>, function: impl Into<String>, args: Vec<xdr::ScVal>) -> Self {
        ContractCall {
            contract_id: contract_id.into(),
            function: function.into(),
            args,
        }
    }
}

/// A one-operation contract-call transaction.
///
/// Soroban resource data and auth entries are empty until the transaction is
/// prepared; signatures are empty until it is signed.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub source_account: String,
    pub sequence: i64,
    pub fee: u32,
    pub max_time: u64,
    pub call: ContractCall,
    pub auth: Vec<xdr::SorobanAuthorizationEntry>,
    pub soroban_data: Option<xdr::SorobanTransactionData>,
    pub signatures: Vec<xdr::DecoratedSignature>,
}

impl Transaction {
    pub fn to_xdr(&self) -> Result<xdr::Transaction> {
        let source = stellar_strkey::ed25519::PublicKey::from_string(&self.source_account)
            .map_err(|_| Error::InvalidAddress(self.source_account.clone()))?;
        let contract = stellar_strkey::Contract::from_string(&self.call.contract_id)
            .map_err(|_| Error::InvalidAddress(self.call.contract_id.clone()))?;

        let operation = xdr::Operation {
            source_account: None,
            body: xdr::OperationBody::InvokeHostFunction(xdr::InvokeHostFunctionOp {
                host_function: xdr::HostFunction::InvokeContract(xdr::InvokeContractArgs {
                    contract_address: xdr::ScAddress::Contract(xdr::Hash(contract.0)),
                    function_name: xdr::ScSymbol(self.call.function.clone().try_into()?),
                    args: self.call.args.clone().try_into()?,
                }),
                auth: self.auth.clone().try_into()?,
            }),
        };

        let ext = match &self.soroban_data {
            Some(data) => xdr::TransactionExt::V1(data.clone()),
            None => xdr::TransactionExt::V0,
        };

        Ok(xdr::Transaction {
            source_account: xdr::MuxedAccount::Ed25519(xdr::Uint256(source.0)),
            fee: self.fee,
            seq_num: xdr::SequenceNumber(self.sequence),
            cond: xdr::Preconditions::Time(xdr::TimeBounds {
                min_time: xdr::TimePoint(0),
                max_time: xdr::TimePoint(self.max_time),
            }),
            memo: xdr::Memo::None,
            operations: vec![operation].try_into()?,
            ext,
        })
    }

    /// Hash signed by the source account; also the network transaction id.
    pub fn hash(&self, network_passphrase: &str) -> Result<[u8; 32]> {
        let payload = xdr::TransactionSignaturePayload {
            network_id: xdr::Hash(Sha256::digest(network_passphrase.as_bytes()).into()),
            tagged_transaction: xdr::TransactionSignaturePayloadTaggedTransaction::Tx(self.to_xdr()?),
        };
        let bytes = payload.to_xdr(Limits::none())?;
        Ok(Sha256::digest(&bytes).into())
    }

    pub fn to_envelope_base64(&self) -> Result<String> {
        let envelope = xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
            tx: self.to_xdr()?,
            signatures: self.signatures.clone().try_into()?,
        });
        Ok(envelope.to_xdr_base64(Limits::none())?)
    }
}

/// Builds the shared transaction skeleton: admin source account, next
/// sequence number, fixed fee and time bound.
pub struct TransactionBuilder {
    source_account: String,
    sequence: i64,
    fee: u32,
    timeout_secs: u64,
    call: Option<ContractCall>,
}

impl TransactionBuilder {
    pub fn new(account: &AccountSequence, fee: u32) -> Self {
        TransactionBuilder {
            source_account: account.account_id.clone(),
            sequence: account.sequence + 1,
            fee,
            timeout_secs: 0,
            call: None,
        }
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn call(mut self, call: ContractCall) -> Self {
        self.call = Some(call);
        self
    }

    pub fn build(self) -> Result<Transaction> {
        let call = self
            .call
            .ok_or_else(|| Error::Xdr("transaction has no contract call".to_string()))?;

        let max_time = if self.timeout_secs == 0 {
            0
        } else {
            chrono::Utc::now().timestamp().max(0) as u64 + self.timeout_secs
        };

        Ok(Transaction {
            source_account: self.source_account,
            sequence: self.sequence,
            fee: self.fee,
            max_time,
            call,
            auth: Vec::new(),
            soroban_data: None,
            signatures: Vec::new(),
        })
    }
}

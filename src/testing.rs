//! In-memory doubles for the network client and the quote provider.

use crate::directory::AccountDirectory;
use async_trait::async_trait;
use common::account::AccountLabel;
use common::forex::SoroswapQuote;
use ledger::client::{AccountSequence, NetworkClient, Simulation};
use ledger::keypair::Keypair;
use ledger::native::Native;
use ledger::network::TESTNET_PASSPHRASE;
use ledger::submit::{STATUS_PENDING, SubmitResponse};
use ledger::transaction::{ContractCall, Transaction};
use ledger::xdr;
use soroswap::{QuoteParams, QuoteProvider};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const ADMIN_SEQUENCE: i64 = 4_242;

pub fn contract(n: u8) -> String {
    ledger::stellar_strkey::Contract([n; 32]).to_string()
}

pub fn account(label: AccountLabel) -> String {
    contract(label as u8 + 1)
}

pub fn multisig() -> String {
    contract(90)
}

pub fn usdc() -> String {
    contract(100)
}

pub fn eurc() -> String {
    contract(101)
}

pub fn accounts() -> BTreeMap<AccountLabel, String> {
    AccountLabel::ALL
        .iter()
        .map(|label| (*label, account(*label)))
        .collect()
}

pub fn directory() -> AccountDirectory {
    AccountDirectory::new(accounts(), Some(multisig()))
}

/// First argument of a call rendered as text, usually the holder address
/// of a `balance` read.
pub fn first_arg(call: &ContractCall) -> Option<String> {
    call.args.first().map(Native::from).and_then(|v| v.as_text())
}

type SimulateFn = dyn Fn(&ContractCall) -> ledger::Result<Option<xdr::ScVal>> + Send + Sync;

pub struct FakeNetworkClient {
    keypair: Keypair,
    simulate: Box<SimulateFn>,
    submit_failure: Mutex<Option<ledger::Error>>,
    submitted: Mutex<Vec<Transaction>>,
}

impl FakeNetworkClient {
    pub fn new() -> Self {
        Self::with_simulation(|_| Ok(None))
    }

    /// Answer every simulation, including the one inside prepare, with `f`.
    pub fn with_simulation(
        f: impl Fn(&ContractCall) -> ledger::Result<Option<xdr::ScVal>> + Send + Sync + 'static,
    ) -> Self {
        FakeNetworkClient {
            keypair: Keypair::from_seed([7u8; 32]),
            simulate: Box::new(f),
            submit_failure: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_submit(self, err: ledger::Error) -> Self {
        *self.submit_failure.lock().unwrap() = Some(err);
        self
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkClient for FakeNetworkClient {
    fn admin_public_key(&self) -> &str {
        self.keypair.public_key()
    }

    async fn get_account_sequence(&self, public_key: &str) -> ledger::Result<AccountSequence> {
        Ok(AccountSequence {
            account_id: public_key.to_string(),
            sequence: ADMIN_SEQUENCE,
        })
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> ledger::Result<Simulation> {
        let result = (self.simulate)(&tx.call)?;
        Ok(Simulation {
            result,
            ..Default::default()
        })
    }

    async fn prepare_transaction(&self, mut tx: Transaction) -> ledger::Result<Transaction> {
        (self.simulate)(&tx.call)?;
        tx.fee += 1_000;
        Ok(tx)
    }

    fn sign_transaction(&self, mut tx: Transaction) -> ledger::Result<Transaction> {
        let hash = tx.hash(TESTNET_PASSPHRASE)?;
        tx.signatures.push(self.keypair.sign_decorated(&hash)?);
        Ok(tx)
    }

    async fn submit_transaction(&self, tx: &Transaction) -> ledger::Result<SubmitResponse> {
        if let Some(err) = self.submit_failure.lock().unwrap().take() {
            return Err(err);
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(tx.clone());
        Ok(SubmitResponse {
            hash: format!("hash-{}", submitted.len()),
            status: STATUS_PENDING.to_string(),
        })
    }
}

type QuoteFn = dyn Fn(&QuoteParams) -> soroswap::Result<SoroswapQuote> + Send + Sync;

pub struct FakeQuoteProvider {
    respond: Box<QuoteFn>,
    requests: Mutex<Vec<QuoteParams>>,
}

impl FakeQuoteProvider {
    pub fn new(
        respond: impl Fn(&QuoteParams) -> soroswap::Result<SoroswapQuote> + Send + Sync + 'static,
    ) -> Self {
        FakeQuoteProvider {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<QuoteParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for FakeQuoteProvider {
    async fn get_quote(&self, params: QuoteParams) -> soroswap::Result<SoroswapQuote> {
        let response = (self.respond)(&params);
        self.requests.lock().unwrap().push(params);
        response
    }
}

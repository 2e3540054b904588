//! Builds the contract-call transactions this service writes and drives them
//! through build, prepare, sign and submit.
//!
//! Every transaction is signed by the admin credential held by the
//! [`NetworkClient`], whichever domain account is the logical sender. The
//! smart accounts enforce their own authorization; this module only relays.

use crate::directory::AccountDirectory;
use crate::error::{Error, Result};
use common::account::{AccountLabel, TransferDestination};
use common::amount::to_fixed_point;
use common::consts::{
    FN_ADMIN_WITHDRAW, FN_APPROVE_MULTISIG_WITHDRAW, FN_EXECUTE_FOREX_TRANSFER,
    FN_EXECUTE_TRANSFER, FN_INITIATE_MULTISIG_WITHDRAW, TRANSACTION_FEE,
    TRANSACTION_TIMEOUT_SECS,
};
use common::forex::ForexDirection;
use common::transaction::TransactionResult;
use ledger::NetworkClient;
use ledger::scval;
use ledger::transaction::{ContractCall, Transaction, TransactionBuilder};
use std::sync::Arc;

pub struct TransferParams {
    pub from: AccountLabel,
    pub to: TransferDestination,
    /// Decimal amount, e.g. "12.5".
    pub amount: String,
}

pub struct AdminWithdrawParams {
    pub from: AccountLabel,
    pub amount: String,
}

pub struct ForexTransferParams {
    pub from: AccountLabel,
    pub to: AccountLabel,
    pub direction: ForexDirection,
    pub amount: String,
    pub min_amount_out: String,
    /// Unix seconds after which the swap must not execute.
    pub deadline: u64,
}

pub struct MultisigWithdrawParams {
    pub initiator: AccountLabel,
    pub to: AccountLabel,
    pub amount: String,
}

pub struct MultisigApprovalParams {
    pub signer: AccountLabel,
    pub request_id: u32,
}

pub struct TransactionOrchestrator {
    client: Arc<dyn NetworkClient>,
    directory: Arc<AccountDirectory>,
    explorer_base_url: String,
}

impl TransactionOrchestrator {
    pub fn new(
        client: Arc<dyn NetworkClient>,
        directory: Arc<AccountDirectory>,
        explorer_base_url: impl Into<String>,
    ) -> Self {
        TransactionOrchestrator {
            client,
            directory,
            explorer_base_url: explorer_base_url.into(),
        }
    }

    pub async fn transfer(&self, params: TransferParams) -> Result<TransactionResult> {
        if params.to == TransferDestination::Account(params.from) {
            return Err(Error::Validation(
                "Source and destination accounts must be different".to_string(),
            ));
        }

        let from = self.directory.address_of(params.from)?;
        let to = self.directory.resolve_destination(params.to)?;
        let amount = to_fixed_point(&params.amount)?;

        log::debug!("Transfer {} -> {} of {}", params.from, params.to, params.amount);
        let args = vec![address_arg("Transfer", to)?, scval::i128(amount)];
        self.execute("Transfer", ContractCall::new(from, FN_EXECUTE_TRANSFER, args))
            .await
    }

    pub async fn admin_withdraw(&self, params: AdminWithdrawParams) -> Result<TransactionResult> {
        let from = self.directory.address_of(params.from)?;
        let amount = to_fixed_point(&params.amount)?;

        log::debug!("Admin withdraw of {} from {}", params.amount, params.from);
        self.execute(
            "Admin withdraw",
            ContractCall::new(from, FN_ADMIN_WITHDRAW, vec![scval::i128(amount)]),
        )
        .await
    }

    pub async fn forex_transfer(&self, params: ForexTransferParams) -> Result<TransactionResult> {
        let from = self.directory.address_of(params.from)?;
        let to = self.directory.address_of(params.to)?;
        let amount = to_fixed_point(&params.amount)?;
        let min_amount_out = to_fixed_point(&params.min_amount_out)?;

        log::debug!(
            "Forex transfer {} {} -> {} of {} (min out {}, deadline {})",
            params.direction,
            params.from,
            params.to,
            params.amount,
            params.min_amount_out,
            params.deadline
        );
        let args = vec![
            address_arg("Forex transfer", to)?,
            scval::i128(amount),
            scval::i128(min_amount_out),
            scval::u64(params.deadline),
            scval::bool(params.direction.swap_to_counter()),
        ];
        self.execute(
            "Forex transfer",
            ContractCall::new(from, FN_EXECUTE_FOREX_TRANSFER, args),
        )
        .await
    }

    pub async fn multisig_withdraw(
        &self,
        params: MultisigWithdrawParams,
    ) -> Result<TransactionResult> {
        let initiator = self.directory.address_of(params.initiator)?;
        let multisig = self.directory.multisig_address()?;
        let to = self.directory.address_of(params.to)?;
        let amount = to_fixed_point(&params.amount)?;

        log::debug!(
            "Multisig withdraw of {} to {} initiated by {}",
            params.amount,
            params.to,
            params.initiator
        );
        let args = vec![
            address_arg("Multisig withdraw", multisig)?,
            address_arg("Multisig withdraw", to)?,
            scval::i128(amount),
        ];
        self.execute(
            "Multisig withdraw",
            ContractCall::new(initiator, FN_INITIATE_MULTISIG_WITHDRAW, args),
        )
        .await
    }

    pub async fn multisig_approval(
        &self,
        params: MultisigApprovalParams,
    ) -> Result<TransactionResult> {
        let signer = self.directory.address_of(params.signer)?;
        let multisig = self.directory.multisig_address()?;

        log::debug!(
            "Multisig approval of request {} by {}",
            params.request_id,
            params.signer
        );
        let args = vec![
            address_arg("Multisig approval", multisig)?,
            scval::u32(params.request_id),
        ];
        self.execute(
            "Multisig approval",
            ContractCall::new(signer, FN_APPROVE_MULTISIG_WITHDRAW, args),
        )
        .await
    }

    async fn execute(&self, operation: &str, call: ContractCall) -> Result<TransactionResult> {
        match self.submit(call).await {
            Ok(hash) => Ok(TransactionResult::new(hash, &self.explorer_base_url)),
            Err(e) => {
                let err = Error::transaction_failure(operation, e);
                log::error!("{}", err);
                Err(err)
            }
        }
    }

    async fn submit(&self, call: ContractCall) -> ledger::Result<String> {
        let tx = build_transaction(self.client.as_ref(), call).await?;

        log::debug!("Preparing transaction (sequence {})", tx.sequence);
        let prepared = self.client.prepare_transaction(tx).await?;
        let signed = self.client.sign_transaction(prepared)?;

        log::debug!("Submitting transaction");
        let response = self.client.submit_transaction(&signed).await?;
        Ok(response.hash)
    }
}

/// Shared skeleton for every call: admin source account at its current
/// sequence, fixed fee and time bound. The sequence is fetched fresh each
/// time, never cached.
pub(crate) async fn build_transaction(
    client: &dyn NetworkClient,
    call: ContractCall,
) -> ledger::Result<Transaction> {
    let account = client
        .get_account_sequence(client.admin_public_key())
        .await?;

    TransactionBuilder::new(&account, TRANSACTION_FEE)
        .timeout(TRANSACTION_TIMEOUT_SECS)
        .call(call)
        .build()
}

fn address_arg(operation: &str, address: &str) -> Result<ledger::xdr::ScVal> {
    scval::address(address).map_err(|e| Error::transaction_failure(operation, e))
}

//! The boundary-facing facade. Raw request values are validated here, then
//! handed to the orchestrator, reconciler, or forex adapter.

use crate::config::{Config, Secret};
use crate::error::{Error, Result};
use crate::forex::ForexQuoteAdapter;
use crate::orchestrator::{
    AdminWithdrawParams, MultisigApprovalParams, MultisigWithdrawParams, TransactionOrchestrator,
    TransferParams,
};
use crate::reconciler::StateReconciler;
use crate::validation::{
    parse_account_label, parse_destination, validate_admin_token, validate_amount,
    validate_different_accounts, validate_request_id,
};
use common::account::AccountLabel;
use common::forex::{ForexBalanceMap, ForexDirection, ForexQuoteSummary, SoroswapQuote};
use common::multisig::MultisigState;
use common::transaction::TransactionResult;
use ledger::keypair::Keypair;
use ledger::{NetworkClient, RpcClient};
use serde::Deserialize;
use serde_json::Value;
use soroswap::{QuoteProvider, SoroswapClient};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Deserialize, Debug, Clone)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AdminWithdrawRequest {
    pub from: String,
    pub amount: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ForexQuoteRequest {
    pub direction: String,
    pub amount: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MultisigWithdrawRequest {
    pub initiator: String,
    pub to: String,
    pub amount: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MultisigApprovalRequest {
    pub signer: String,
    /// Kept raw so that strings, negatives and fractions are rejected with
    /// a validation error rather than a parse failure.
    #[serde(rename = "requestId")]
    pub request_id: Value,
}

pub struct Remittance {
    orchestrator: Arc<TransactionOrchestrator>,
    reconciler: StateReconciler,
    forex: Option<ForexQuoteAdapter>,
    admin_auth_token: Option<Secret>,
}

impl Remittance {
    /// Build the RPC and quote clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let keypair = Keypair::from_secret(config.admin_secret_key.expose())?;
        match &config.admin_public_key {
            Some(expected) if expected != keypair.public_key() => log::warn!(
                "ADMIN_PUBLIC_KEY {} does not match the key derived from ADMIN_SECRET_KEY ({})",
                expected,
                keypair.public_key()
            ),
            _ => {}
        }
        log::debug!(
            "Using admin account {} on {}",
            keypair.public_key(),
            config.network
        );

        let client = RpcClient::new(
            config.rpc_url.clone(),
            keypair,
            config.network.passphrase(),
            config.rpc_timeout,
        )?;

        let api_key = match &config.soroswap.api_key {
            Some(key) => key.expose().to_string(),
            None => {
                log::warn!("SOROSWAP_API_KEY is not set; quote requests will be rejected by the provider");
                String::new()
            }
        };
        let quotes = SoroswapClient::new(
            config.soroswap.api_url.clone(),
            api_key,
            config.soroswap.network.clone(),
            config.soroswap.protocols.clone(),
            config.rpc_timeout,
        )?;

        Ok(Self::with_clients(config, Arc::new(client), Arc::new(quotes)))
    }

    pub fn with_clients(
        config: &Config,
        client: Arc<dyn NetworkClient>,
        quotes: Arc<dyn QuoteProvider>,
    ) -> Self {
        let directory = Arc::new(config.directory());
        let orchestrator = Arc::new(TransactionOrchestrator::new(
            client.clone(),
            directory.clone(),
            config.explorer_base_url.clone(),
        ));
        let reconciler = StateReconciler::new(
            client,
            directory,
            config.usdc_contract_id.clone(),
            config.multisig.clone(),
        );

        let forex = config
            .forex_settings()
            .map(|settings| ForexQuoteAdapter::new(quotes, orchestrator.clone(), settings));
        if forex.is_none() {
            log::info!("EURC_CONTRACT_ID is not set; forex operations are disabled");
        }

        Remittance {
            orchestrator,
            reconciler,
            forex,
            admin_auth_token: config.admin_auth_token.clone(),
        }
    }

    pub async fn fetch_balances(&self) -> Result<BTreeMap<AccountLabel, String>> {
        self.reconciler.fetch_balances().await
    }

    pub async fn fetch_forex_balances(&self) -> Result<ForexBalanceMap> {
        let forex = self.forex()?;
        self.reconciler.fetch_forex_balances(forex.settings()).await
    }

    pub async fn fetch_multisig_state(&self) -> Result<MultisigState> {
        self.reconciler.fetch_multisig_state().await
    }

    pub async fn submit_transfer(&self, request: TransferRequest) -> Result<TransactionResult> {
        let from = parse_account_label(&request.from, "from")?;
        let to = parse_destination(&request.to, "to")?;
        validate_different_accounts(from, to)?;
        let amount = validate_amount(&request.amount)?.to_string();

        self.orchestrator
            .transfer(TransferParams { from, to, amount })
            .await
    }

    /// `authorization` is the raw `Authorization` header value.
    pub async fn submit_admin_withdraw(
        &self,
        authorization: Option<&str>,
        request: AdminWithdrawRequest,
    ) -> Result<TransactionResult> {
        let expected = self
            .admin_auth_token
            .as_ref()
            .map(Secret::expose)
            .unwrap_or_default();
        validate_admin_token(authorization, expected)?;

        let from = parse_account_label(&request.from, "from")?;
        let amount = validate_amount(&request.amount)?.to_string();

        self.orchestrator
            .admin_withdraw(AdminWithdrawParams { from, amount })
            .await
    }

    pub async fn request_forex_quote(&self, request: ForexQuoteRequest) -> Result<ForexQuoteSummary> {
        let forex = self.forex()?;
        let direction: ForexDirection = request.direction.parse().map_err(Error::Validation)?;
        let amount = validate_amount(&request.amount)?;

        forex.request_quote(direction, amount).await
    }

    /// Execute a quote returned by [`Remittance::request_forex_quote`],
    /// passed back unmodified.
    pub async fn submit_forex_swap(&self, quote: Option<SoroswapQuote>) -> Result<TransactionResult> {
        let forex = self.forex()?;
        let quote = quote.ok_or_else(|| Error::Validation("quote is required".to_string()))?;

        forex.submit_swap(&quote).await
    }

    pub async fn submit_multisig_withdraw(
        &self,
        request: MultisigWithdrawRequest,
    ) -> Result<TransactionResult> {
        let initiator = parse_account_label(&request.initiator, "initiator")?;
        let to = parse_account_label(&request.to, "to")?;
        let amount = validate_amount(&request.amount)?.to_string();

        self.orchestrator
            .multisig_withdraw(MultisigWithdrawParams {
                initiator,
                to,
                amount,
            })
            .await
    }

    pub async fn submit_multisig_approval(
        &self,
        request: MultisigApprovalRequest,
    ) -> Result<TransactionResult> {
        let signer = parse_account_label(&request.signer, "signer")?;
        let request_id = validate_request_id(&request.request_id)?;

        self.orchestrator
            .multisig_approval(MultisigApprovalParams { signer, request_id })
            .await
    }

    fn forex(&self) -> Result<&ForexQuoteAdapter> {
        self.forex.as_ref().ok_or_else(|| {
            Error::Configuration("Forex is not configured: EURC_CONTRACT_ID is not set".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeNetworkClient, FakeQuoteProvider, first_arg};
    use common::consts::{FN_ADMIN_WITHDRAW, FN_APPROVE_MULTISIG_WITHDRAW, FN_EXECUTE_TRANSFER};
    use ledger::native::Native;
    use ledger::scval;
    use serde_json::json;

    fn config(extra: &[(&str, String)]) -> Config {
        let mut pairs: Vec<(String, String)> = vec![
            ("ADMIN_SECRET_KEY".to_string(), "unused-in-tests".to_string()),
            ("USDC_CONTRACT_ID".to_string(), testing::usdc()),
            ("MULTISIG_CONTRACT_ID".to_string(), testing::multisig()),
            ("ADMIN_AUTH_TOKEN".to_string(), "s3cret".to_string()),
        ];
        for label in AccountLabel::ALL {
            pairs.push((format!("SMART_ACCOUNT_{}", label), testing::account(label)));
        }
        pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.clone())));

        Config::from_lookup(move |key| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    fn quote_provider() -> Arc<FakeQuoteProvider> {
        Arc::new(FakeQuoteProvider::new(|params| {
            Ok(serde_json::from_value(json!({
                "assetIn": params.asset_in,
                "assetOut": params.asset_out,
                "amountIn": params.amount,
                "amountOut": "9200000",
                "tradeType": "EXACT_IN"
            }))
            .unwrap())
        }))
    }

    fn service(client: Arc<FakeNetworkClient>, config: &Config) -> Remittance {
        Remittance::with_clients(config, client, quote_provider())
    }

    #[tokio::test]
    async fn test_transfer_is_validated_then_submitted() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client.clone(), &config(&[]));

        let result = remittance
            .submit_transfer(TransferRequest {
                from: "A".to_string(),
                to: "MULTISIG".to_string(),
                amount: "2.5".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.hash, "hash-1");
        assert_eq!(client.submitted()[0].call.function, FN_EXECUTE_TRANSFER);

        for (from, to, amount) in [("A", "A", "1"), ("E", "B", "1"), ("A", "B", "0"), ("A", "B", "1.123456789")] {
            let err = remittance
                .submit_transfer(TransferRequest {
                    from: from.to_string(),
                    to: to.to_string(),
                    amount: amount.to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{:?}", err);
        }
        assert_eq!(client.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_withdraw_requires_token() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client.clone(), &config(&[]));
        let request = || AdminWithdrawRequest {
            from: "B".to_string(),
            amount: "10".to_string(),
        };

        let err = remittance
            .submit_admin_withdraw(Some("Bearer nope"), request())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert!(client.submitted().is_empty());

        remittance
            .submit_admin_withdraw(Some("Bearer s3cret"), request())
            .await
            .unwrap();
        let call = &client.submitted()[0].call;
        assert_eq!(call.function, FN_ADMIN_WITHDRAW);
        assert_eq!(call.contract_id, testing::account(AccountLabel::B));
    }

    #[tokio::test]
    async fn test_admin_withdraw_without_configured_token() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client, &config(&[("ADMIN_AUTH_TOKEN", String::new())]));

        let err = remittance
            .submit_admin_withdraw(
                Some("Bearer s3cret"),
                AdminWithdrawRequest {
                    from: "B".to_string(),
                    amount: "10".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_multisig_approval_validates_request_id() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client.clone(), &config(&[]));

        let err = remittance
            .submit_multisig_approval(MultisigApprovalRequest {
                signer: "C".to_string(),
                request_id: json!("3"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        remittance
            .submit_multisig_approval(MultisigApprovalRequest {
                signer: "C".to_string(),
                request_id: json!(3.0),
            })
            .await
            .unwrap();

        // The signer's own smart account relays the approval to the treasury.
        let call = &client.submitted()[0].call;
        assert_eq!(call.function, FN_APPROVE_MULTISIG_WITHDRAW);
        assert_eq!(call.contract_id, testing::account(AccountLabel::C));
        let args: Vec<Native> = call.args.iter().map(Native::from).collect();
        assert_eq!(
            args,
            vec![Native::Address(testing::multisig()), Native::Int(3)]
        );
    }

    #[tokio::test]
    async fn test_multisig_withdraw_rejects_treasury_destination() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client, &config(&[]));

        let err = remittance
            .submit_multisig_withdraw(MultisigWithdrawRequest {
                initiator: "A".to_string(),
                to: "MULTISIG".to_string(),
                amount: "1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_forex_disabled_without_eurc() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client, &config(&[]));

        let err = remittance
            .request_forex_quote(ForexQuoteRequest {
                direction: "USDC_TO_EURC".to_string(),
                amount: "10".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
        assert!(remittance.fetch_forex_balances().await.is_err());
    }

    #[tokio::test]
    async fn test_forex_quote_then_swap() {
        let client = Arc::new(FakeNetworkClient::new());
        let remittance = service(client.clone(), &config(&[("EURC_CONTRACT_ID", testing::eurc())]));

        let err = remittance
            .request_forex_quote(ForexQuoteRequest {
                direction: "USD_TO_GBP".to_string(),
                amount: "10".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let summary = remittance
            .request_forex_quote(ForexQuoteRequest {
                direction: "USDC_TO_EURC".to_string(),
                amount: "1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(summary.amount_in, "1");
        assert_eq!(summary.amount_out, "0.92");
        assert_eq!(summary.rate, "0.920000");

        assert!(matches!(
            remittance.submit_forex_swap(None).await,
            Err(Error::Validation(_))
        ));
        let result = remittance.submit_forex_swap(Some(summary.quote)).await.unwrap();
        assert_eq!(result.hash, "hash-1");
        assert_eq!(
            client.submitted()[0].call.contract_id,
            testing::account(AccountLabel::A)
        );
    }

    #[tokio::test]
    async fn test_reads_pass_through() {
        let client = Arc::new(FakeNetworkClient::with_simulation(|call| {
            match first_arg(call) {
                Some(_) => Ok(Some(scval::i128(30_000_000))),
                None => Ok(None),
            }
        }));
        let remittance = service(client, &config(&[("EURC_CONTRACT_ID", testing::eurc())]));

        let balances = remittance.fetch_balances().await.unwrap();
        assert!(balances.values().all(|b| b == "3"));

        let forex = remittance.fetch_forex_balances().await.unwrap();
        assert_eq!(forex.new_york.balance, "3");
        assert_eq!(forex.london.balance, "3");

        let state = remittance.fetch_multisig_state().await.unwrap();
        assert_eq!(state.balance, "3");
        assert!(state.requests.is_empty());
    }

    #[test]
    fn test_from_config_rejects_bad_secret() {
        let err = Remittance::from_config(&config(&[])).err().unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }
}

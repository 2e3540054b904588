//! Read-only state reconstruction through simulation.
//!
//! Individual balance reads degrade to zero instead of failing the whole
//! call. The degradation is kept as a [`BalanceOutcome`] until the result
//! is rendered, so callers that need the cause can still see it.

use crate::directory::AccountDirectory;
use crate::error::{Error, Result};
use crate::forex::ForexSettings;
use crate::orchestrator::build_transaction;
use crate::snapshot;
use common::account::AccountLabel;
use common::amount::{FixedPointAmount, from_fixed_point};
use common::consts::{FN_BALANCE, FN_GET_SUMMARY, FN_LIST_REQUESTS, MULTISIG_PSEUDO_LABEL};
use common::forex::{Asset, City, ForexBalance, ForexBalanceMap};
use common::multisig::{MultisigRequestRecord, MultisigState, MultisigSummary};
use ledger::NetworkClient;
use ledger::native::Native;
use ledger::scval;
use ledger::transaction::ContractCall;
use ledger::xdr::ScVal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Why a balance read fell back to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degraded {
    pub account: String,
    pub reason: String,
}

pub type BalanceOutcome = std::result::Result<FixedPointAmount, Degraded>;

/// Render an outcome; degraded reads become "0" and are logged.
pub fn collapse(outcome: &BalanceOutcome) -> String {
    match outcome {
        Ok(amount) => from_fixed_point(*amount),
        Err(degraded) => {
            log::warn!(
                "Balance for {} degraded to 0: {}",
                degraded.account,
                degraded.reason
            );
            "0".to_string()
        }
    }
}

/// Treasury defaults, overridden by the contract's own summary when it
/// answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigSettings {
    pub label: String,
    pub threshold: u32,
    pub signers: Vec<AccountLabel>,
}

pub struct StateReconciler {
    client: Arc<dyn NetworkClient>,
    directory: Arc<AccountDirectory>,
    usdc_contract_id: String,
    multisig: MultisigSettings,
}

impl StateReconciler {
    pub fn new(
        client: Arc<dyn NetworkClient>,
        directory: Arc<AccountDirectory>,
        usdc_contract_id: impl Into<String>,
        multisig: MultisigSettings,
    ) -> Self {
        StateReconciler {
            client,
            directory,
            usdc_contract_id: usdc_contract_id.into(),
            multisig,
        }
    }

    pub async fn fetch_balances(&self) -> Result<BTreeMap<AccountLabel, String>> {
        let outcomes = self.fetch_balance_outcomes().await?;
        Ok(outcomes
            .iter()
            .map(|(label, outcome)| (*label, collapse(outcome)))
            .collect())
    }

    /// USDC balance of every domain account, read concurrently.
    pub async fn fetch_balance_outcomes(&self) -> Result<BTreeMap<AccountLabel, BalanceOutcome>> {
        let reads = AccountLabel::ALL
            .iter()
            .map(|label| (*label, self.usdc_contract_id.clone()))
            .collect();
        Ok(self.gather(reads).await?.into_iter().collect())
    }

    pub async fn fetch_forex_balances(&self, settings: &ForexSettings) -> Result<ForexBalanceMap> {
        let reads = vec![
            (settings.usdc_account, settings.usdc_contract_id.clone()),
            (settings.eurc_account, settings.eurc_contract_id.clone()),
        ];
        let outcomes = self.gather(reads).await?;

        let balance_at = |index: usize| {
            outcomes
                .get(index)
                .map(|(_, outcome)| collapse(outcome))
                .unwrap_or_else(|| "0".to_string())
        };

        Ok(ForexBalanceMap {
            new_york: ForexBalance {
                account: settings.usdc_account,
                city: City::NewYork,
                asset: Asset::Usdc,
                balance: balance_at(0),
            },
            london: ForexBalance {
                account: settings.eurc_account,
                city: City::London,
                asset: Asset::Eurc,
                balance: balance_at(1),
            },
        })
    }

    /// Treasury balance, summary and request list, read concurrently. Only
    /// a missing treasury address is an error.
    pub async fn fetch_multisig_state(&self) -> Result<MultisigState> {
        let multisig = self.directory.multisig_address()?;
        let client = self.client.as_ref();

        let (balance, requests, summary) = tokio::join!(
            read_balance(client, &self.usdc_contract_id, multisig),
            self.read_requests(multisig),
            self.read_summary(multisig),
        );

        let balance = balance.map_err(|e| Degraded {
            account: MULTISIG_PSEUDO_LABEL.to_string(),
            reason: e.to_string(),
        });

        let (label, threshold) = match summary {
            Some(summary) => (summary.label, summary.threshold),
            None => (self.multisig.label.clone(), self.multisig.threshold),
        };

        Ok(MultisigState {
            balance: collapse(&balance),
            label,
            threshold,
            signers: self.multisig.signers.clone(),
            requests,
        })
    }

    async fn read_requests(&self, multisig: &str) -> Vec<MultisigRequestRecord> {
        match simulate(self.client.as_ref(), ContractCall::new(multisig, FN_LIST_REQUESTS, vec![]))
            .await
        {
            Ok(Some(value)) => snapshot::decode_requests(Native::from(&value), &self.directory),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to fetch multisig requests: {}", e);
                Vec::new()
            }
        }
    }

    async fn read_summary(&self, multisig: &str) -> Option<MultisigSummary> {
        let value = match simulate(self.client.as_ref(), ContractCall::new(multisig, FN_GET_SUMMARY, vec![]))
            .await
        {
            Ok(value) => value?,
            Err(e) => {
                log::warn!("Failed to fetch multisig summary, using configured values: {}", e);
                return None;
            }
        };
        decode_summary(Native::from(&value))
    }

    /// Spawn one read per `(holder, token)` pair. Results keep input order.
    async fn gather(
        &self,
        reads: Vec<(AccountLabel, String)>,
    ) -> Result<Vec<(AccountLabel, BalanceOutcome)>> {
        let handles: Vec<_> = reads
            .iter()
            .map(|(label, token)| {
                let label = *label;
                let client = self.client.clone();
                let token = token.clone();
                let holder = self.directory.address_of(label).map(str::to_string);

                tokio::spawn(async move {
                    let outcome = match holder {
                        Ok(holder) => read_balance(client.as_ref(), &token, &holder)
                            .await
                            .map_err(|e| e.to_string()),
                        Err(e) => Err(e.to_string()),
                    };
                    outcome.map_err(|reason| Degraded {
                        account: label.to_string(),
                        reason,
                    })
                })
            })
            .collect();

        let joined = futures::future::join_all(handles).await;

        let mut outcomes = Vec::with_capacity(joined.len());
        let mut failed_accounts = Vec::new();
        for ((label, _), result) in reads.iter().zip(joined) {
            match result {
                Ok(outcome) => outcomes.push((*label, outcome)),
                Err(e) => {
                    log::error!("Balance task for {} did not complete: {}", label, e);
                    failed_accounts.push(label.to_string());
                }
            }
        }

        if !failed_accounts.is_empty() {
            return Err(Error::BalanceFetch {
                message: format!(
                    "Failed to fetch balances for: {}",
                    failed_accounts.join(", ")
                ),
                failed_accounts,
            });
        }
        Ok(outcomes)
    }
}

async fn simulate(client: &dyn NetworkClient, call: ContractCall) -> ledger::Result<Option<ScVal>> {
    let tx = build_transaction(client, call).await?;
    Ok(client.simulate_transaction(&tx).await?.result)
}

/// A missing return value reads as zero.
async fn read_balance(
    client: &dyn NetworkClient,
    token: &str,
    holder: &str,
) -> ledger::Result<FixedPointAmount> {
    let call = ContractCall::new(token, FN_BALANCE, vec![scval::address(holder)?]);
    match simulate(client, call).await? {
        Some(value) => scval::to_i128(&value).ok_or_else(|| {
            ledger::Error::Network(format!("Balance of {} is not an integer", holder))
        }),
        None => Ok(0),
    }
}

fn decode_summary(value: Native) -> Option<MultisigSummary> {
    let fields = match value {
        Native::Map(entries) => snapshot::normalize_map(entries),
        Native::Object(fields) => fields,
        _ => return None,
    };

    let int = |name: &str| {
        fields
            .get(name)
            .and_then(Native::as_int)
            .and_then(|v| u32::try_from(v).ok())
    };
    let label = fields
        .get("label")
        .and_then(Native::as_text)
        .filter(|label| !label.is_empty())?;

    Some(MultisigSummary {
        threshold: int("threshold")?,
        signer_count: int("signer_count").unwrap_or(0),
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeNetworkClient, first_arg};
    use common::account::AccountLabel::{A, B, C, D};
    use common::consts::DEFAULT_MULTISIG_LABEL;
    use ledger::xdr;

    fn settings() -> MultisigSettings {
        MultisigSettings {
            label: DEFAULT_MULTISIG_LABEL.to_string(),
            threshold: 3,
            signers: vec![A, B, C, D],
        }
    }

    fn reconciler(client: FakeNetworkClient) -> StateReconciler {
        StateReconciler::new(
            Arc::new(client),
            Arc::new(testing::directory()),
            testing::usdc(),
            settings(),
        )
    }

    fn string(s: String) -> ScVal {
        ScVal::String(xdr::ScString(s.try_into().unwrap()))
    }

    fn symbol(s: &str) -> ScVal {
        ScVal::Symbol(xdr::ScSymbol(s.to_string().try_into().unwrap()))
    }

    fn vec_val(items: Vec<ScVal>) -> ScVal {
        ScVal::Vec(Some(xdr::ScVec(items.try_into().unwrap())))
    }

    fn request(id: u32, to: AccountLabel, approvals: &[AccountLabel]) -> ScVal {
        vec_val(vec![
            ScVal::U32(id),
            string(testing::account(to)),
            scval::i128(10_000_000),
            vec_val(approvals.iter().map(|a| string(testing::account(*a))).collect()),
            ScVal::Bool(false),
            string(testing::account(A)),
            ScVal::U64(1_700_000_000),
            ScVal::U64(0),
        ])
    }

    fn summary() -> ScVal {
        let entry = |key: &str, val: ScVal| xdr::ScMapEntry {
            key: symbol(key),
            val,
        };
        ScVal::Map(Some(xdr::ScMap(
            vec![
                entry("label", string("Ops Treasury".to_string())),
                entry("signer_count", ScVal::U32(4)),
                entry("threshold", ScVal::U32(2)),
            ]
            .try_into()
            .unwrap(),
        )))
    }

    fn balance_of(holder: &str) -> i128 {
        if holder == testing::account(A) {
            10_500_000_000
        } else if holder == testing::account(B) {
            2_500_000
        } else if holder == testing::account(D) {
            1
        } else {
            70_000_000
        }
    }

    #[tokio::test]
    async fn test_failed_balance_degrades_to_zero() {
        let client = FakeNetworkClient::with_simulation(|call| {
            let holder = first_arg(call).unwrap();
            if holder == testing::account(C) {
                return Err(ledger::Error::Network("connection reset".to_string()));
            }
            Ok(Some(scval::i128(balance_of(&holder))))
        });
        let reconciler = reconciler(client);

        let balances = reconciler.fetch_balances().await.unwrap();
        assert_eq!(balances.len(), 4);
        assert_eq!(balances[&A], "1050");
        assert_eq!(balances[&B], "0.25");
        assert_eq!(balances[&C], "0");
        assert_eq!(balances[&D], "0.0000001");

        let outcomes = reconciler.fetch_balance_outcomes().await.unwrap();
        let degraded = outcomes[&C].clone().unwrap_err();
        assert_eq!(degraded.account, "C");
        assert!(degraded.reason.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_aborted_balance_task_is_balance_fetch_error() {
        let client = FakeNetworkClient::with_simulation(|call| {
            let holder = first_arg(call).unwrap();
            if holder == testing::account(C) {
                panic!("simulation crashed");
            }
            Ok(Some(scval::i128(balance_of(&holder))))
        });
        let reconciler = reconciler(client);

        let err = reconciler.fetch_balances().await.unwrap_err();
        match err {
            Error::BalanceFetch {
                message,
                failed_accounts,
            } => {
                assert_eq!(failed_accounts, vec!["C".to_string()]);
                assert_eq!(message, "Failed to fetch balances for: C");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_account_degrades_to_zero() {
        let mut accounts = testing::accounts();
        accounts.remove(&D);
        let reconciler = StateReconciler::new(
            Arc::new(FakeNetworkClient::with_simulation(|_| Ok(Some(scval::i128(5))))),
            Arc::new(AccountDirectory::new(accounts, Some(testing::multisig()))),
            testing::usdc(),
            settings(),
        );

        let balances = reconciler.fetch_balances().await.unwrap();
        assert_eq!(balances[&D], "0");
        assert_eq!(balances[&A], "0.0000005");
    }

    #[tokio::test]
    async fn test_forex_balances_read_each_token() {
        let client = FakeNetworkClient::with_simulation(|call| {
            let value = if call.contract_id == testing::eurc() { 30_000_000 } else { 120_000_000 };
            Ok(Some(scval::i128(value)))
        });
        let forex = ForexSettings {
            usdc_contract_id: testing::usdc(),
            eurc_contract_id: testing::eurc(),
            usdc_account: A,
            eurc_account: B,
        };

        let balances = reconciler(client).fetch_forex_balances(&forex).await.unwrap();
        assert_eq!(balances.new_york.account, A);
        assert_eq!(balances.new_york.balance, "12");
        assert_eq!(balances.london.account, B);
        assert_eq!(balances.london.asset, Asset::Eurc);
        assert_eq!(balances.london.balance, "3");
    }

    #[tokio::test]
    async fn test_multisig_state_sorted_and_summarized() {
        let client = FakeNetworkClient::with_simulation(|call| match call.function.as_str() {
            FN_LIST_REQUESTS => Ok(Some(vec_val(vec![
                request(1, B, &[A]),
                request(3, C, &[A, B, A]),
                request(2, D, &[]),
            ]))),
            FN_GET_SUMMARY => Ok(Some(summary())),
            FN_BALANCE => Ok(Some(scval::i128(990_000_000))),
            other => panic!("unexpected call {}", other),
        });

        let state = reconciler(client).fetch_multisig_state().await.unwrap();
        assert_eq!(state.balance, "99");
        assert_eq!(state.label, "Ops Treasury");
        assert_eq!(state.threshold, 2);
        assert_eq!(state.signers, vec![A, B, C, D]);

        let ids: Vec<u32> = state.requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(state.requests[0].approvals, vec![A, B]);
    }

    #[tokio::test]
    async fn test_multisig_state_survives_read_failures() {
        let client = FakeNetworkClient::with_simulation(|call| match call.function.as_str() {
            FN_BALANCE => Ok(Some(scval::i128(10_000_000))),
            _ => Err(ledger::Error::Network("Simulation failed".to_string())),
        });

        let state = reconciler(client).fetch_multisig_state().await.unwrap();
        assert_eq!(state.balance, "1");
        assert!(state.requests.is_empty());
        assert_eq!(state.label, DEFAULT_MULTISIG_LABEL);
        assert_eq!(state.threshold, 3);
    }

    #[tokio::test]
    async fn test_multisig_state_requires_treasury() {
        let reconciler = StateReconciler::new(
            Arc::new(FakeNetworkClient::new()),
            Arc::new(AccountDirectory::new(testing::accounts(), None)),
            testing::usdc(),
            settings(),
        );
        assert!(matches!(
            reconciler.fetch_multisig_state().await,
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_decode_summary_requires_threshold_and_label() {
        assert_eq!(
            decode_summary(Native::from(&summary())),
            Some(MultisigSummary {
                threshold: 2,
                signer_count: 4,
                label: "Ops Treasury".to_string(),
            })
        );
        assert_eq!(decode_summary(Native::Int(2)), None);
    }
}

use crate::directory::AccountDirectory;
use crate::error::{Error, Result};
use crate::forex::ForexSettings;
use crate::reconciler::MultisigSettings;
use common::account::AccountLabel;
use common::consts::{DEFAULT_MULTISIG_LABEL, DEFAULT_MULTISIG_THRESHOLD};
use ledger::network::Network;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::time::Duration;

const DEFAULT_RPC_URL: &str = "https://soroban-testnet.stellar.org";
const DEFAULT_SOROSWAP_API_URL: &str = "https://api.soroswap.finance";
const DEFAULT_SOROSWAP_NETWORK: &str = "testnet";
const DEFAULT_SOROSWAP_PROTOCOLS: &str = "soroswap,phoenix,aqua";
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// A credential that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct SoroswapConfig {
    pub api_url: String,
    pub api_key: Option<Secret>,
    /// Network the quotes are fetched from, independent of `Config::network`.
    pub network: String,
    pub protocols: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    pub admin_secret_key: Secret,
    pub admin_public_key: Option<String>,
    pub admin_auth_token: Option<Secret>,
    pub usdc_contract_id: String,
    pub explorer_base_url: String,
    pub accounts: BTreeMap<AccountLabel, String>,
    pub multisig_contract_id: Option<String>,
    pub multisig: MultisigSettings,
    pub eurc_contract_id: Option<String>,
    pub forex_usdc_account: AccountLabel,
    pub forex_eurc_account: AccountLabel,
    pub soroswap: SoroswapConfig,
    pub rpc_timeout: Duration,
}

/// The document the deployment script writes next to the contracts.
#[derive(Deserialize, Debug, Default)]
struct DeployedConfig {
    #[serde(default)]
    network: Option<String>,
    #[serde(rename = "rpcUrl", default)]
    rpc_url: Option<String>,
    #[serde(rename = "usdcContractId", default)]
    usdc_contract_id: Option<String>,
    #[serde(rename = "adminPublicKey", default)]
    admin_public_key: Option<String>,
    #[serde(default)]
    accounts: BTreeMap<AccountLabel, String>,
}

impl DeployedConfig {
    fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("Failed to read {}: {}", path, e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Configuration(format!("Failed to parse {}: {}", path, e)))
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Config> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. Blank values count as
    /// unset. Values missing from the lookup fall back to the deployment
    /// document named by `ACCOUNTS_CONFIG_PATH`, then to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let deployed = match var("ACCOUNTS_CONFIG_PATH") {
            Some(path) => {
                log::debug!("Loading deployment config from {}", path);
                DeployedConfig::load(&path)?
            }
            None => DeployedConfig::default(),
        };

        let network = match var("NETWORK").or(deployed.network) {
            Some(name) => name.parse::<Network>().map_err(Error::Configuration)?,
            None => Network::default(),
        };

        let admin_secret_key = var("ADMIN_SECRET_KEY")
            .map(Secret)
            .ok_or_else(|| Error::Configuration("ADMIN_SECRET_KEY is required".to_string()))?;

        let usdc_contract_id = var("USDC_CONTRACT_ID")
            .or(deployed.usdc_contract_id)
            .ok_or_else(|| Error::Configuration("USDC_CONTRACT_ID is required".to_string()))?;

        let mut accounts = deployed.accounts;
        for label in AccountLabel::ALL {
            if let Some(address) = var(&format!("SMART_ACCOUNT_{}", label)) {
                accounts.insert(label, address);
            }
        }
        for label in AccountLabel::ALL {
            if !accounts.contains_key(&label) {
                log::warn!("SMART_ACCOUNT_{} is not set; account {} is unavailable", label, label);
            }
        }

        let multisig = MultisigSettings {
            label: var("MULTISIG_LABEL").unwrap_or_else(|| DEFAULT_MULTISIG_LABEL.to_string()),
            threshold: match var("MULTISIG_THRESHOLD") {
                Some(raw) => raw.parse().map_err(|_| {
                    Error::Configuration(format!("MULTISIG_THRESHOLD must be an integer, got '{}'", raw))
                })?,
                None => DEFAULT_MULTISIG_THRESHOLD,
            },
            signers: match var("MULTISIG_SIGNERS") {
                Some(raw) => parse_labels(&raw, "MULTISIG_SIGNERS")?,
                None => AccountLabel::ALL.to_vec(),
            },
        };

        let forex_usdc_account = match var("FOREX_USDC_ACCOUNT") {
            Some(raw) => parse_label(&raw, "FOREX_USDC_ACCOUNT")?,
            None => AccountLabel::A,
        };
        let forex_eurc_account = match var("FOREX_EURC_ACCOUNT") {
            Some(raw) => parse_label(&raw, "FOREX_EURC_ACCOUNT")?,
            None => AccountLabel::B,
        };

        let soroswap = SoroswapConfig {
            api_url: var("SOROSWAP_API_URL").unwrap_or_else(|| DEFAULT_SOROSWAP_API_URL.to_string()),
            api_key: var("SOROSWAP_API_KEY").map(Secret),
            network: var("SOROSWAP_QUOTE_NETWORK")
                .unwrap_or_else(|| DEFAULT_SOROSWAP_NETWORK.to_string()),
            protocols: var("SOROSWAP_PROTOCOLS")
                .unwrap_or_else(|| DEFAULT_SOROSWAP_PROTOCOLS.to_string())
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        };

        let rpc_timeout = match var("RPC_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map(Duration::from_secs).map_err(|_| {
                Error::Configuration(format!("RPC_TIMEOUT_SECS must be an integer, got '{}'", raw))
            })?,
            None => Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        };

        Ok(Config {
            rpc_url: var("SOROBAN_RPC_URL")
                .or(deployed.rpc_url)
                .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            admin_secret_key,
            admin_public_key: var("ADMIN_PUBLIC_KEY").or(deployed.admin_public_key),
            admin_auth_token: var("ADMIN_AUTH_TOKEN").map(Secret),
            usdc_contract_id,
            explorer_base_url: var("EXPLORER_BASE_URL")
                .unwrap_or_else(|| network.default_explorer_url().to_string()),
            network,
            accounts,
            multisig_contract_id: var("MULTISIG_CONTRACT_ID"),
            multisig,
            eurc_contract_id: var("EURC_CONTRACT_ID"),
            forex_usdc_account,
            forex_eurc_account,
            soroswap,
            rpc_timeout,
        })
    }

    pub fn directory(&self) -> AccountDirectory {
        AccountDirectory::new(self.accounts.clone(), self.multisig_contract_id.clone())
    }

    /// `None` until `EURC_CONTRACT_ID` is configured.
    pub fn forex_settings(&self) -> Option<ForexSettings> {
        let eurc_contract_id = self.eurc_contract_id.clone()?;
        Some(ForexSettings {
            usdc_contract_id: self.usdc_contract_id.clone(),
            eurc_contract_id,
            usdc_account: self.forex_usdc_account,
            eurc_account: self.forex_eurc_account,
        })
    }
}

fn parse_label(raw: &str, key: &str) -> Result<AccountLabel> {
    raw.parse()
        .map_err(|_| Error::Configuration(format!("{} must be one of A, B, C, D, got '{}'", key, raw)))
}

fn parse_labels(raw: &str, key: &str) -> Result<Vec<AccountLabel>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_label(s, key))
        .collect()
}

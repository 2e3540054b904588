use crate::QuoteProvider;
use crate::error::{Error, Result};
use async_trait::async_trait;
use common::forex::SoroswapQuote;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

const MAINNET_HINT: &str = "Please confirm that Soroswap currently has liquidity for this pair.";
const TESTNET_HINT: &str = "Set SOROSWAP_QUOTE_NETWORK=mainnet to fetch quotes from mainnet while contracts stay on testnet.";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeType {
    #[default]
    #[serde(rename = "EXACT_IN")]
    ExactIn,
    #[serde(rename = "EXACT_OUT")]
    ExactOut,
}

#[derive(Debug, Clone)]
pub struct QuoteParams {
    pub asset_in: String,
    pub asset_out: String,
    /// Atomic units (already scaled by the token decimals).
    pub amount: String,
    pub trade_type: TradeType,
}

#[derive(Serialize)]
struct QuoteBody<'a> {
    #[serde(rename = "assetIn")]
    asset_in: &'a str,
    #[serde(rename = "assetOut")]
    asset_out: &'a str,
    amount: &'a str,
    #[serde(rename = "tradeType")]
    trade_type: TradeType,
    protocols: &'a [String],
}

pub struct SoroswapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    network: String,
    protocols: Vec<String>,
}

impl fmt::Debug for SoroswapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoroswapClient")
            .field("base_url", &self.base_url)
            .field("network", &self.network)
            .field("protocols", &self.protocols)
            .finish_non_exhaustive()
    }
}

impl SoroswapClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        network: impl Into<String>,
        protocols: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(SoroswapClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            network: network.into(),
            protocols,
        })
    }

    async fn post<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("Soroswap request {} (network={})", url, self.network);

        let res = self
            .http
            .post(&url)
            .query(&[("network", self.network.as_str())])
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to reach Soroswap API: {}", e)))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read Soroswap API response: {}", e)))?;

        if !status.is_success() {
            return Err(classify(status.as_u16(), &text, endpoint, &self.network));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Network(format!("Failed to parse Soroswap API response: {}", e)))
    }
}

#[async_trait]
impl QuoteProvider for SoroswapClient {
    async fn get_quote(&self, params: QuoteParams) -> Result<SoroswapQuote> {
        let body = QuoteBody {
            asset_in: &params.asset_in,
            asset_out: &params.asset_out,
            amount: &params.amount,
            trade_type: params.trade_type,
            protocols: &self.protocols,
        };

        let value = self.post("/quote", &body).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::Network(format!("Unexpected Soroswap quote shape: {}", e)))
    }
}

/// Map a failed API answer to an error kind, keeping the provider's own
/// message when the body carries one.
pub fn classify(status: u16, body: &str, endpoint: &str, network: &str) -> Error {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let base = parsed
        .as_ref()
        .and_then(|data| {
            ["message", "error", "details"]
                .iter()
                .find_map(|key| data.get(key).and_then(|v| v.as_str()))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Soroswap API request to {} failed", endpoint));

    let lowered = base.to_lowercase();
    let message = if lowered.contains("quote failed") || lowered.contains("no quote") {
        let hint = if network == "mainnet" {
            MAINNET_HINT
        } else {
            TESTNET_HINT
        };
        format!("{}. {}", base, hint)
    } else {
        base
    };

    match status {
        401 | 403 => Error::Unauthorized(format!(
            "{}. Please verify the SOROSWAP_API_KEY environment variable.",
            message
        )),
        400..=499 => Error::Validation(message),
        _ => Error::Network(message),
    }
}

use crate::account::AccountLabel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForexDirection {
    #[serde(rename = "USDC_TO_EURC")]
    UsdcToEurc,
    #[serde(rename = "EURC_TO_USDC")]
    EurcToUsdc,
}

impl ForexDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForexDirection::UsdcToEurc => "USDC_TO_EURC",
            ForexDirection::EurcToUsdc => "EURC_TO_USDC",
        }
    }

    /// The `swapToCounter` flag of `execute_forex_transfer`.
    pub fn swap_to_counter(&self) -> bool {
        matches!(self, ForexDirection::UsdcToEurc)
    }
}

impl fmt::Display for ForexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForexDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USDC_TO_EURC" => Ok(ForexDirection::UsdcToEurc),
            "EURC_TO_USDC" => Ok(ForexDirection::EurcToUsdc),
            other => Err(format!(
                "direction must be USDC_TO_EURC or EURC_TO_USDC. Received: {}",
                other
            )),
        }
    }
}

/// Quote payload as returned by the Soroswap API.
///
/// The provider's object is kept verbatim, explicit nulls and unknown fields
/// included, so the swap step replays exactly what was quoted. The accessors
/// are a read-only view over it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct SoroswapQuote(Map<String, Value>);

impl SoroswapQuote {
    pub fn new(fields: Map<String, Value>) -> Self {
        SoroswapQuote(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn asset_in(&self) -> Option<&str> {
        self.get("assetIn").and_then(Value::as_str)
    }

    pub fn asset_out(&self) -> Option<&str> {
        self.get("assetOut").and_then(Value::as_str)
    }

    /// Provider-assigned quote id, when it is a non-empty string.
    pub fn quote_id(&self) -> Option<&str> {
        self.get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Atomic input amount as an integer string.
    pub fn amount_in_atomic(&self) -> Option<String> {
        scalar_text(self.get("amountIn"))
    }

    /// Atomic output amount as an integer string.
    pub fn amount_out_atomic(&self) -> Option<String> {
        scalar_text(self.get("amountOut"))
    }

    /// `expiresAt`, else `expiration`, rendered as text whether the
    /// provider sent a timestamp string or epoch number.
    pub fn expiry(&self) -> Option<String> {
        scalar_text(self.get("expiresAt")).or_else(|| scalar_text(self.get("expiration")))
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForexQuoteSummary {
    #[serde(rename = "amountIn")]
    pub amount_in: String,
    #[serde(rename = "amountOut")]
    pub amount_out: String,
    pub rate: String,
    pub direction: ForexDirection,
    #[serde(rename = "quoteId")]
    pub quote_id: String,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub quote: SoroswapQuote,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    #[serde(rename = "New York")]
    NewYork,
    #[serde(rename = "London")]
    London,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    #[serde(rename = "USDC")]
    Usdc,
    #[serde(rename = "EURC")]
    Eurc,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForexBalance {
    pub account: AccountLabel,
    pub city: City,
    pub asset: Asset,
    pub balance: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForexBalanceMap {
    #[serde(rename = "newYork")]
    pub new_york: ForexBalance,
    pub london: ForexBalance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_keeps_unknown_fields() {
        let raw = json!({
            "id": "q-1",
            "assetIn": "CUSDC",
            "assetOut": "CEURC",
            "amountIn": "10000000",
            "amountOut": 9200000,
            "tradeType": "EXACT_IN",
            "routePlan": [{"protocol": "soroswap", "path": ["CUSDC", "CEURC"]}],
            "priceImpactPct": "0.01"
        });

        let quote: SoroswapQuote = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(quote.quote_id(), Some("q-1"));
        assert_eq!(quote.amount_in_atomic().as_deref(), Some("10000000"));
        assert_eq!(quote.amount_out_atomic().as_deref(), Some("9200000"));
        assert_eq!(quote.asset_in(), Some("CUSDC"));
        assert_eq!(serde_json::to_value(&quote).unwrap(), raw);
    }

    #[test]
    fn test_quote_replays_verbatim() {
        let raw = r#"{"id":null,"amountIn":"10000000","amountOut":"9200000","expiresAt":1700000000,"tradeType":null,"routePlan":[]}"#;

        let quote: SoroswapQuote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.quote_id(), None);
        assert_eq!(quote.asset_in(), None);
        assert_eq!(quote.expiry().as_deref(), Some("1700000000"));

        let replayed = serde_json::to_string(&quote).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&replayed).unwrap(), original);
        assert!(!replayed.contains("assetIn"));
    }

    #[test]
    fn test_expiry_falls_back_to_expiration() {
        let quote: SoroswapQuote =
            serde_json::from_value(json!({"expiration": "2026-10-15T12:00:00Z"})).unwrap();
        assert_eq!(quote.expiry().as_deref(), Some("2026-10-15T12:00:00Z"));

        let quote: SoroswapQuote = serde_json::from_value(json!({"expiresAt": null})).unwrap();
        assert_eq!(quote.expiry(), None);
    }

    #[test]
    fn test_direction_wire_names() {
        let direction: ForexDirection = serde_json::from_str("\"EURC_TO_USDC\"").unwrap();
        assert_eq!(direction, ForexDirection::EurcToUsdc);
        assert!(!direction.swap_to_counter());
        assert!(ForexDirection::UsdcToEurc.swap_to_counter());
    }
}

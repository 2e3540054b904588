use crate::error::{Error, Result};
use crate::orchestrator::{ForexTransferParams, TransactionOrchestrator};
use common::account::AccountLabel;
use common::amount::{FixedPointAmount, from_fixed_point, to_fixed_point};
use common::consts::FOREX_DEADLINE_SECS;
use common::forex::{ForexDirection, ForexQuoteSummary, SoroswapQuote};
use common::transaction::TransactionResult;
use soroswap::{QuoteParams, QuoteProvider, TradeType};
use std::sync::Arc;

/// Token contracts and the account holding each side of the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForexSettings {
    pub usdc_contract_id: String,
    pub eurc_contract_id: String,
    pub usdc_account: AccountLabel,
    pub eurc_account: AccountLabel,
}

impl ForexSettings {
    /// `(asset_in, asset_out)` for a direction.
    pub fn assets(&self, direction: ForexDirection) -> (&str, &str) {
        match direction {
            ForexDirection::UsdcToEurc => (self.usdc_contract_id.as_str(), self.eurc_contract_id.as_str()),
            ForexDirection::EurcToUsdc => (self.eurc_contract_id.as_str(), self.usdc_contract_id.as_str()),
        }
    }

    /// `(from, to)` accounts for a direction.
    pub fn legs(&self, direction: ForexDirection) -> (AccountLabel, AccountLabel) {
        match direction {
            ForexDirection::UsdcToEurc => (self.usdc_account, self.eurc_account),
            ForexDirection::EurcToUsdc => (self.eurc_account, self.usdc_account),
        }
    }

    /// Direction implied by the quote's own asset ids.
    pub fn direction_of(&self, quote: &SoroswapQuote) -> Result<ForexDirection> {
        [ForexDirection::UsdcToEurc, ForexDirection::EurcToUsdc]
            .into_iter()
            .find(|direction| {
                let (asset_in, asset_out) = self.assets(*direction);
                quote.asset_in() == Some(asset_in) && quote.asset_out() == Some(asset_out)
            })
            .ok_or_else(|| Error::Validation("Quote does not match supported forex pairs".to_string()))
    }
}

pub struct ForexQuoteAdapter {
    provider: Arc<dyn QuoteProvider>,
    orchestrator: Arc<TransactionOrchestrator>,
    settings: ForexSettings,
}

impl ForexQuoteAdapter {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        orchestrator: Arc<TransactionOrchestrator>,
        settings: ForexSettings,
    ) -> Self {
        ForexQuoteAdapter {
            provider,
            orchestrator,
            settings,
        }
    }

    pub fn settings(&self) -> &ForexSettings {
        &self.settings
    }

    pub async fn request_quote(
        &self,
        direction: ForexDirection,
        amount: &str,
    ) -> Result<ForexQuoteSummary> {
        let (asset_in, asset_out) = self.settings.assets(direction);
        let atomic_amount = to_fixed_point(amount)?;

        log::debug!("Requesting {} quote for {}", direction, amount);
        let quote = self
            .provider
            .get_quote(QuoteParams {
                asset_in: asset_in.to_string(),
                asset_out: asset_out.to_string(),
                amount: atomic_amount.to_string(),
                trade_type: TradeType::ExactIn,
            })
            .await?;

        let amount_out = quote.amount_out_atomic().ok_or_else(|| {
            Error::Validation("Soroswap quote did not return an amountOut value".to_string())
        })?;
        let amount_in = match quote.amount_in_atomic() {
            Some(value) => parse_atomic(&value)?,
            None => atomic_amount,
        };

        let amount_in = from_fixed_point(amount_in);
        let amount_out = from_fixed_point(parse_atomic(&amount_out)?);
        let direction = self.settings.direction_of(&quote)?;
        let quote_id = quote
            .quote_id()
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(ForexQuoteSummary {
            rate: format_rate(&amount_in, &amount_out),
            amount_in,
            amount_out,
            direction,
            quote_id,
            expires_at: quote.expiry(),
            quote,
        })
    }

    /// Execute a previously returned quote. The direction always comes
    /// from the quote itself.
    pub async fn submit_swap(&self, quote: &SoroswapQuote) -> Result<TransactionResult> {
        let direction = self.settings.direction_of(quote)?;
        let (Some(amount_in), Some(amount_out)) =
            (quote.amount_in_atomic(), quote.amount_out_atomic())
        else {
            return Err(Error::Validation(
                "Quote is missing amount information".to_string(),
            ));
        };

        let amount = from_fixed_point(parse_atomic(&amount_in)?);
        let min_amount_out = from_fixed_point(parse_atomic(&amount_out)?);
        let deadline = chrono::Utc::now().timestamp().max(0) as u64 + FOREX_DEADLINE_SECS;
        let (from, to) = self.settings.legs(direction);

        self.orchestrator
            .forex_transfer(ForexTransferParams {
                from,
                to,
                direction,
                amount,
                min_amount_out,
                deadline,
            })
            .await
    }
}

fn parse_atomic(value: &str) -> Result<FixedPointAmount> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("Quote amount '{}' is not an integer", value)))
}

/// Display rate with 6 decimals. Zero or unparsable input gives
/// "0.000000" instead of a division artifact.
pub fn format_rate(amount_in: &str, amount_out: &str) -> String {
    const ZERO_RATE: &str = "0.000000";

    let (Ok(input), Ok(output)) = (amount_in.parse::<f64>(), amount_out.parse::<f64>()) else {
        return ZERO_RATE.to_string();
    };
    if !input.is_finite() || input == 0.0 {
        return ZERO_RATE.to_string();
    }

    let rate = output / input;
    if rate.is_finite() {
        format!("{:.6}", rate)
    } else {
        ZERO_RATE.to_string()
    }
}

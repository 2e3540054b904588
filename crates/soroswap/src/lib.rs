//! Client for the Soroswap aggregator quote API.

pub mod client;
pub mod error;

pub use client::{QuoteParams, SoroswapClient, TradeType};
pub use error::{Error, Result};

use async_trait::async_trait;
use common::forex::SoroswapQuote;

/// Source of swap quotes. The returned quote must be replayed unmodified
/// when the swap is executed.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn get_quote(&self, params: QuoteParams) -> Result<SoroswapQuote>;
}

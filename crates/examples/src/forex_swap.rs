/// Example: Execute a quote saved by `forex_quote`
///
/// Run with: cargo run -p examples --bin forex_swap
///
/// Reads the quote from QUOTE_INPUT (default quote.json). The quote is sent
/// unmodified; its assets decide the swap direction.
use common::forex::SoroswapQuote;
use remit::{Config, Remittance};
use std::env;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let input = env::var("QUOTE_INPUT").unwrap_or_else(|_| "quote.json".to_string());
    let raw = std::fs::read_to_string(&input)
        .map_err(|e| format!("Failed to read {}: {}", input, e))?;
    let quote: SoroswapQuote =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid quote in {}: {}", input, e))?;

    log::debug!("Loaded quote {:?}", quote.quote_id());
    println!(
        "\nSwapping {} -> {}",
        quote.asset_in().unwrap_or("?"),
        quote.asset_out().unwrap_or("?")
    );

    let result = remittance
        .submit_forex_swap(Some(quote))
        .await
        .map_err(|e| format!("{}: {}", e.code(), e))?;

    println!("✅ Swap submitted: {}", result.explorer_url);

    Ok(())
}

/// Example: Ask the quote provider for a USDC/EURC swap quote
///
/// Run with: cargo run -p examples --bin forex_quote
///
/// Requires EURC_CONTRACT_ID and SOROSWAP_API_KEY. The full quote is written
/// to QUOTE_OUTPUT (default quote.json) so `forex_swap` can execute it.
use remit::service::ForexQuoteRequest;
use remit::{Config, Remittance};
use std::env;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let request = ForexQuoteRequest {
        direction: env::var("FOREX_DIRECTION").unwrap_or_else(|_| "USDC_TO_EURC".to_string()),
        amount: env::var("FOREX_AMOUNT").unwrap_or_else(|_| "10".to_string()),
    };
    println!("\nQuoting {} {}...", request.amount, request.direction);

    let summary = remittance
        .request_forex_quote(request)
        .await
        .map_err(|e| format!("{}: {}", e.code(), e))?;

    println!("In:      {}", summary.amount_in);
    println!("Out:     {}", summary.amount_out);
    println!("Rate:    {}", summary.rate);
    println!("Quote:   {}", summary.quote_id);
    if let Some(expires_at) = &summary.expires_at {
        println!("Expires: {}", expires_at);
    }

    let output = env::var("QUOTE_OUTPUT").unwrap_or_else(|_| "quote.json".to_string());
    let json = serde_json::to_string_pretty(&summary.quote).map_err(|e| e.to_string())?;
    std::fs::write(&output, json).map_err(|e| format!("Failed to write {}: {}", output, e))?;
    println!("\nSaved quote to {}", output);

    Ok(())
}

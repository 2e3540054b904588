/// Example: Show both legs of the forex corridor
///
/// Run with: cargo run -p examples --bin forex_balances
///
/// Requires EURC_CONTRACT_ID. FOREX_USDC_ACCOUNT and FOREX_EURC_ACCOUNT pick
/// the accounts holding each side (defaults A and B).
use remit::{Config, Remittance};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let balances = remittance
        .fetch_forex_balances()
        .await
        .map_err(|e| format!("Failed to fetch forex balances: {}", e))?;

    println!("\n💱 Forex corridor");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for leg in [&balances.new_york, &balances.london] {
        println!(
            "  {:<9} account {}  {} {:?}",
            format!("{:?}", leg.city),
            leg.account,
            leg.balance,
            leg.asset
        );
    }

    Ok(())
}

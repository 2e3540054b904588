/// Example: Check the USDC balance of every smart account
///
/// Run with: cargo run -p examples --bin check_balances
///
/// Required environment variables:
/// - ADMIN_SECRET_KEY, USDC_CONTRACT_ID
/// - SMART_ACCOUNT_A..SMART_ACCOUNT_D (or ACCOUNTS_CONFIG_PATH)
///
/// A balance that cannot be read shows as 0; run with RUST_LOG=warn to see
/// why.
use remit::{Config, Remittance};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    println!("\n📊 Smart account balances on {}", config.network);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let balances = remittance
        .fetch_balances()
        .await
        .map_err(|e| format!("Failed to fetch balances: {}", e))?;

    for (label, balance) in &balances {
        let address = config
            .accounts
            .get(label)
            .map(String::as_str)
            .unwrap_or("(not configured)");
        println!("  {}  {:>20} USDC  {}", label, balance, address);
    }

    Ok(())
}

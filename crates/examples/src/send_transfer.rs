/// Example: Transfer USDC between smart accounts, or into the treasury
///
/// Run with: cargo run -p examples --bin send_transfer
///
/// Make sure to set up your .env file with the required configuration.
/// TRANSFER_FROM and TRANSFER_TO take A-D; TRANSFER_TO also accepts MULTISIG.
use remit::service::TransferRequest;
use remit::{Config, Remittance};
use std::env;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let request = TransferRequest {
        from: env::var("TRANSFER_FROM").unwrap_or_else(|_| "A".to_string()),
        to: env::var("TRANSFER_TO").unwrap_or_else(|_| "B".to_string()),
        amount: env::var("TRANSFER_AMOUNT").unwrap_or_else(|_| "1".to_string()),
    };

    println!("\nSending {} USDC", request.amount);
    println!("From: {}", request.from);
    println!("To: {}", request.to);

    println!("\nSubmitting transfer...");
    let result = remittance
        .submit_transfer(request)
        .await
        .map_err(|e| format!("{}: {}", e.code(), e))?;

    println!("✅ Transfer submitted successfully!");
    println!("Hash: {}", result.hash);
    println!("Explorer: {}", result.explorer_url);

    Ok(())
}

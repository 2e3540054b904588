/// Example: Open a treasury withdrawal request
///
/// Run with: cargo run -p examples --bin multisig_withdraw
///
/// MULTISIG_INITIATOR (default A) opens the request paying MULTISIG_TO
/// (default B). The other signers approve it with `multisig_approve`.
use remit::service::MultisigWithdrawRequest;
use remit::{Config, Remittance};
use std::env;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let request = MultisigWithdrawRequest {
        initiator: env::var("MULTISIG_INITIATOR").unwrap_or_else(|_| "A".to_string()),
        to: env::var("MULTISIG_TO").unwrap_or_else(|_| "B".to_string()),
        amount: env::var("MULTISIG_AMOUNT").unwrap_or_else(|_| "1".to_string()),
    };
    println!(
        "\n{} requests {} USDC from the treasury for {}",
        request.initiator, request.amount, request.to
    );

    let result = remittance
        .submit_multisig_withdraw(request)
        .await
        .map_err(|e| format!("{}: {}", e.code(), e))?;

    println!("✅ Request submitted: {}", result.explorer_url);

    Ok(())
}

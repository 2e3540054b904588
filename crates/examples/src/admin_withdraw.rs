/// Example: Pull funds from a smart account back to the admin
///
/// Run with: cargo run -p examples --bin admin_withdraw
///
/// Required environment variables (besides the usual configuration):
/// - ADMIN_AUTH_TOKEN: the token admin operations are checked against
/// - WITHDRAW_FROM (default A), WITHDRAW_AMOUNT (default 1)
use remit::service::AdminWithdrawRequest;
use remit::{Config, Remittance};
use std::env;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    // Present the configured token the way an HTTP caller would.
    let token = env::var("ADMIN_AUTH_TOKEN").expect("ADMIN_AUTH_TOKEN must be set");
    let authorization = format!("Bearer {}", token);

    let request = AdminWithdrawRequest {
        from: env::var("WITHDRAW_FROM").unwrap_or_else(|_| "A".to_string()),
        amount: env::var("WITHDRAW_AMOUNT").unwrap_or_else(|_| "1".to_string()),
    };
    println!("\nWithdrawing {} USDC from account {}", request.amount, request.from);

    let result = remittance
        .submit_admin_withdraw(Some(&authorization), request)
        .await
        .map_err(|e| format!("{}: {}", e.code(), e))?;

    println!("✅ Withdrawal submitted: {}", result.explorer_url);

    Ok(())
}

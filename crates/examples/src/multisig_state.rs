/// Example: Show the treasury balance and its withdrawal requests
///
/// Run with: cargo run -p examples --bin multisig_state
///
/// Requires MULTISIG_CONTRACT_ID in addition to the usual configuration.
use remit::{Config, Remittance};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let state = remittance
        .fetch_multisig_state()
        .await
        .map_err(|e| format!("Failed to fetch multisig state: {}", e))?;

    println!("\n🏦 {}", state.label);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Balance:   {} USDC", state.balance);
    println!(
        "Threshold: {} of {}",
        state.threshold,
        state.signers.len()
    );

    if state.requests.is_empty() {
        println!("\nNo withdrawal requests.");
        return Ok(());
    }

    println!("\nRequests (latest first):");
    for request in &state.requests {
        let approvals: Vec<String> = request.approvals.iter().map(|a| a.to_string()).collect();
        let status = if request.executed { "executed" } else { "pending" };
        println!(
            "  #{:<4} {:>14} USDC -> {}  by {}  approvals [{}]  {}",
            request.id,
            request.amount,
            request.to,
            request.initiator,
            approvals.join(", "),
            status
        );
    }

    Ok(())
}

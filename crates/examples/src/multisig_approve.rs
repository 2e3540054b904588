/// Example: Approve a pending treasury withdrawal request
///
/// Run with: MULTISIG_SIGNER=B MULTISIG_REQUEST_ID=3 cargo run -p examples --bin multisig_approve
use remit::service::MultisigApprovalRequest;
use remit::{Config, Remittance};
use std::env;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    let remittance = Remittance::from_config(&config).map_err(|e| e.to_string())?;

    let signer = env::var("MULTISIG_SIGNER").expect("MULTISIG_SIGNER must be set");
    let request_id: u64 = env::var("MULTISIG_REQUEST_ID")
        .expect("MULTISIG_REQUEST_ID must be set")
        .parse()
        .map_err(|e| format!("MULTISIG_REQUEST_ID: {}", e))?;

    println!("\n{} approving request #{}", signer, request_id);

    let result = remittance
        .submit_multisig_approval(MultisigApprovalRequest {
            signer,
            request_id: serde_json::Value::from(request_id),
        })
        .await
        .map_err(|e| format!("{}: {}", e.code(), e))?;

    println!("✅ Approval submitted: {}", result.explorer_url);

    Ok(())
}

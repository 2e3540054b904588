use crate::error::{Error, Result};
use crate::rpc::SendTransactionResult;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_DUPLICATE: &str = "DUPLICATE";
pub const STATUS_TRY_AGAIN_LATER: &str = "TRY_AGAIN_LATER";
pub const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub hash: String,
    pub status: String,
}

/// Turn a `sendTransaction` result into an accepted submission.
///
/// Anything other than an accepted, hash-bearing response is a
/// `Error::Transaction`. The hash is kept when present: such a transaction
/// may still land, so its outcome is unknown rather than rolled back.
pub fn interpret(response: SendTransactionResult) -> Result<SubmitResponse> {
    let hash = response.hash.filter(|h| !h.is_empty());

    if response.status == STATUS_ERROR || response.error_result_xdr.is_some() {
        return Err(Error::Transaction {
            message: format!(
                "Transaction failed: {}",
                response
                    .error_result_xdr
                    .as_deref()
                    .unwrap_or("Unknown error")
            ),
            hash,
        });
    }

    if response.status == STATUS_TRY_AGAIN_LATER {
        return Err(Error::Transaction {
            message: "Transaction was not accepted, the network asked to try again later"
                .to_string(),
            hash,
        });
    }

    if response.status == STATUS_DUPLICATE {
        log::warn!(
            "Transaction {} was already submitted, treating it as accepted",
            hash.as_deref().unwrap_or("<no hash>")
        );
    }

    match hash {
        Some(hash) => {
            log::info!("Transaction {} accepted with status {}", hash, response.status);
            Ok(SubmitResponse {
                hash,
                status: response.status,
            })
        }
        None => Err(Error::Transaction {
            message: "Transaction was submitted but no hash was returned".to_string(),
            hash: None,
        }),
    }
}

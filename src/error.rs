use common::account::UnknownLabel;
use common::amount::AmountError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the core surfaces to its caller.
///
/// Messages never carry secret material; `code()` and `status_code()` give
/// the boundary layer a stable machine-readable kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The RPC endpoint or the quote provider could not be reached, or
    /// answered with something unusable.
    #[error("{0}")]
    Network(String),

    /// The build/prepare/sign/submit pipeline failed. When `hash` is set the
    /// transaction reached the network and its outcome is unknown.
    #[error("{message}")]
    Transaction {
        message: String,
        hash: Option<String>,
    },

    /// The balance gather step itself failed, as opposed to a single
    /// account degrading to zero.
    #[error("{message}")]
    BalanceFetch {
        message: String,
        failed_accounts: Vec<String>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Configuration(String),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "INVALID_INPUT",
            Error::Network(_) => "NETWORK_ERROR",
            Error::Transaction { .. } => "TRANSACTION_FAILED",
            Error::BalanceFetch { .. } => "BALANCE_FETCH_FAILED",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::Network(_) => 503,
            Error::Transaction { .. } | Error::BalanceFetch { .. } | Error::Configuration(_) => 500,
        }
    }

    /// Hash of a transaction whose outcome is unknown.
    pub fn transaction_hash(&self) -> Option<&str> {
        match self {
            Error::Transaction { hash, .. } => hash.as_deref(),
            _ => None,
        }
    }

    /// Wrap a pipeline failure once, prefixed with the operation name.
    /// Submission failures already carry their own message and hash.
    pub(crate) fn transaction_failure(operation: &str, err: ledger::Error) -> Error {
        match err {
            ledger::Error::Transaction { message, hash } => Error::Transaction { message, hash },
            other => Error::Transaction {
                message: format!("{} failed: {}", operation, other),
                hash: None,
            },
        }
    }
}

impl From<ledger::Error> for Error {
    fn from(err: ledger::Error) -> Self {
        match err {
            ledger::Error::Network(message) => Error::Network(message),
            ledger::Error::Xdr(message) => Error::Network(format!("Malformed ledger data: {}", message)),
            ledger::Error::Transaction { message, hash } => Error::Transaction { message, hash },
            ledger::Error::InvalidKey(message) => Error::Configuration(format!("Invalid key: {}", message)),
            ledger::Error::InvalidAddress(address) => {
                Error::Configuration(format!("Invalid contract address '{}'", address))
            }
        }
    }
}

impl From<soroswap::Error> for Error {
    fn from(err: soroswap::Error) -> Self {
        match err {
            soroswap::Error::Network(message) => Error::Network(message),
            soroswap::Error::Unauthorized(message) => Error::Unauthorized(message),
            soroswap::Error::Validation(message) => Error::Validation(message),
        }
    }
}

impl From<AmountError> for Error {
    fn from(err: AmountError) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<UnknownLabel> for Error {
    fn from(err: UnknownLabel) -> Self {
        Error::Validation(err.to_string())
    }
}

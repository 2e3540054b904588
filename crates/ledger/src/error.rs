use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The endpoint could not be reached, answered with a failure, or sent
    /// something that could not be parsed.
    #[error("{0}")]
    Network(String),

    /// The endpoint accepted the request but the submission did not yield a
    /// usable result. `hash` is set when the network assigned one anyway.
    #[error("{message}")]
    Transaction {
        message: String,
        hash: Option<String>,
    },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("XDR error: {0}")]
    Xdr(String),
}

impl From<stellar_xdr::curr::Error> for Error {
    fn from(err: stellar_xdr::curr::Error) -> Self {
        Error::Xdr(err.to_string())
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport failure, 5xx answer, or a body that is not JSON.
    #[error("{0}")]
    Network(String),

    /// The API rejected the key (401/403).
    #[error("{0}")]
    Unauthorized(String),

    /// Any other 4xx answer.
    #[error("{0}")]
    Validation(String),
}

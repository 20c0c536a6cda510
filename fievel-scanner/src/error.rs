use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Fetch failed for {address}: {reason}")]
    FetchFailed { address: String, reason: String },

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Round coordination failed: {0}")]
    RoundCoordination(#[from] tokio::task::JoinError),
}

impl ScanError {
    pub(crate) fn fetch_failed(address: impl Into<String>, reason: impl ToString) -> Self {
        ScanError::FetchFailed {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

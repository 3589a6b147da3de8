//! Error types for the backend client.

use twin_core::{Domain, TwinError};

/// Errors from calls to the dashboard backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{endpoint} reported status {status:?}")]
    Rejected { endpoint: String, status: String },
    #[error("no {0} endpoint exists for this request")]
    UnsupportedDomain(Domain),
}

impl From<BackendError> for TwinError {
    fn from(err: BackendError) -> Self {
        TwinError::Backend(err.to_string())
    }
}

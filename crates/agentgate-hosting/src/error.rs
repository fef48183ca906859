//! Error types for the hosting collaborator

use thiserror::Error;

/// Errors that can occur talking to the hosting platform
#[derive(Error, Debug)]
pub enum HostingError {
    /// Repository slug missing or malformed
    #[error("hosting is not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Non-success status from the API
    #[error("{method} {url} returned {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A paginated listing stopped short of the advertised total
    #[error("incomplete listing: received {received} of {total}")]
    Incomplete { received: usize, total: u64 },
}

impl From<reqwest::Error> for HostingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HostingError::Timeout
        } else if err.is_decode() {
            HostingError::Decode(err.to_string())
        } else {
            HostingError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HostingError {
    fn from(err: serde_json::Error) -> Self {
        HostingError::Decode(err.to_string())
    }
}

/// Result type for hosting operations
pub type Result<T> = std::result::Result<T, HostingError>;

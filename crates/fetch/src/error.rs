//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The server answered with a non-success status that is not retried.
    /// The body is kept for post-mortem inspection.
    #[display("HTTP {status} from {url}")]
    Status {
        status: u16,
        url: String,
        body: Vec<u8>,
    },
    /// A bounded retry policy gave up on a transient server error.
    #[display("giving up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },
    /// The request never produced a response (DNS, connection, TLS, timeout).
    #[display("network error requesting {_0}")]
    Network(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("could not build HTTP client")]
    Client,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. } | Self::Network(_))
    }

    /// Response body of a failed request, if the server sent one.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

//! Client Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! The kinds are `Clone` on purpose: an in-flight request may be awaited by
//! any number of callers, and each of them gets the failure.

use derive_more::{Display, Error};
use mikra_ref::RefParseError;

/// A client error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (connection, TLS, timeout at
    /// the transport layer).
    #[display("http transport error")]
    Http,
    /// The server answered with a non-success status.
    #[display("api returned status {_0}")]
    Status(#[error(not(source))] u16),
    /// The server answered 200 with an error payload.
    #[display("api error: {_0}")]
    Api(#[error(not(source))] String),
    /// The response body was not the expected shape.
    #[display("unexpected response shape")]
    Decode,
    /// The ref argument didn't parse; the inner value is the parse error.
    #[display("{_0}")]
    Ref(#[error(not(source))] RefParseError),
    /// Configuration could not be loaded.
    #[display("configuration error")]
    Config,
    /// Persisted client state could not be read or written.
    #[display("preference store error")]
    Store,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed. No layer below the caller
    /// retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Http => true,
            ErrorKind::Status(status) => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryability() {
        assert!(ErrorKind::Http.is_retryable());
        assert!(ErrorKind::Status(503).is_retryable());
        assert!(!ErrorKind::Status(404).is_retryable());
        assert!(!ErrorKind::Ref(RefParseError::UnknownBook).is_retryable());
    }

    #[test]
    fn ref_errors_show_the_parse_message() {
        assert_eq!(ErrorKind::Ref(RefParseError::UnknownBook).to_string(), "Unknown book.");
    }
}

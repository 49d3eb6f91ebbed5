//! Unified error types for awning.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the store, the transport, and the worker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Serializing a value for storage failed.
    #[error("ENCODE_ERROR: {0}")]
    Encode(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Transport-level network failure (connection, DNS, timeout).
    ///
    /// HTTP error statuses are not errors: the transport returns them as
    /// ordinary responses so strategies can forward them.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// A lifecycle operation was attempted out of order.
    #[error("LIFECYCLE_ERROR: invalid transition {from} -> {to}")]
    Lifecycle { from: String, to: String },
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Network("connection refused".to_string());
        assert!(err.to_string().contains("NETWORK_ERROR"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_lifecycle_display_names_both_phases() {
        let err = Error::Lifecycle { from: "installing".to_string(), to: "active".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("installing"));
        assert!(msg.contains("active"));
    }
}

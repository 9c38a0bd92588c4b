//! Error types for modlock.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use thiserror::Error;

/// Main error type for lock storage operations.
///
/// Failures are not recovered locally; every operation aborts and propagates
/// its error to the caller.
#[derive(Error, Debug)]
pub enum LockError {
    /// The storage backend could not be reached when opening the store.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A query, write, or delete against the lock collection failed.
    #[error("storage operation failed: {0}")]
    Storage(String),

    /// Configuration could not be read, parsed, or validated.
    #[error("{0}")]
    Config(String),
}

/// Result type alias for modlock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_message_is_descriptive() {
        let err = LockError::Connection("server unreachable".to_string());
        assert_eq!(err.to_string(), "connection failed: server unreachable");
    }

    #[test]
    fn storage_error_message_is_descriptive() {
        let err = LockError::Storage("query timed out".to_string());
        assert_eq!(err.to_string(), "storage operation failed: query timed out");
    }

    #[test]
    fn config_error_passes_message_through() {
        let err = LockError::Config("bad yaml".to_string());
        assert_eq!(err.to_string(), "bad yaml");
    }
}

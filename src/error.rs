//! Error types for txnbuf
//!
//! Provides a unified error type for all buffer, iterator and encoding operations.

use thiserror::Error;

/// Result type alias using TxnBufError
pub type Result<T> = std::result::Result<T, TxnBufError>;

/// Unified error type for txnbuf operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxnBufError {
    // -------------------------------------------------------------------------
    // Buffer Errors
    // -------------------------------------------------------------------------
    /// Key was never set, or currently holds a tombstone
    #[error("Key not exist")]
    KeyNotExist,

    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    /// Failure reported by an external clean stream
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for TxnBufError {
    fn from(err: bincode::Error) -> Self {
        TxnBufError::Serialization(err.to_string())
    }
}

impl TxnBufError {
    /// True for the recoverable "absent or deleted" condition
    pub fn is_key_not_exist(&self) -> bool {
        matches!(self, TxnBufError::KeyNotExist)
    }
}

//! Error handling for the ledger node
//!
//! This module provides the error type shared by every ledger operation.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger, consensus and transport operations
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// A submitted transaction is missing values
    InvalidTransaction(String),
    /// A request body could not be decoded or is incomplete
    InvalidRequest(String),
    /// A candidate chain broke linkage or proof-of-work
    InvalidChain(String),
    /// The chain has no blocks, which initialization never allows
    EmptyChain,
    /// The tip moved while a proof was being searched
    StaleProof { expected: u64, actual: u64 },
    /// Mining gave up
    Mining(String),
    /// Network communication errors
    Network(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(String),
}

impl LedgerError {
    /// Whether the error was caused by the caller's input rather than the node
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidTransaction(_) | LedgerError::InvalidRequest(_)
        )
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {msg}"),
            LedgerError::InvalidRequest(msg) => write!(f, "Invalid request: {msg}"),
            LedgerError::InvalidChain(msg) => write!(f, "Invalid chain: {msg}"),
            LedgerError::EmptyChain => write!(f, "Chain has no blocks"),
            LedgerError::StaleProof { expected, actual } => write!(
                f,
                "Stale proof: searched against last proof {expected}, tip now has {actual}"
            ),
            LedgerError::Mining(msg) => write!(f, "Mining error: {msg}"),
            LedgerError::Network(msg) => write!(f, "Network error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

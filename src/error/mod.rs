//! Error handling for the ledger
//!
//! This module provides the error types shared by all ledger operations.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error types for ledger operations
#[derive(Debug, Clone)]
pub enum LedgerError {
    /// Cryptographic operation errors
    Crypto(String),
    /// Public key bytes that are not a valid SEC1 uncompressed P-256 point
    InvalidKeyEncoding(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// Block validation errors
    InvalidBlock(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            LedgerError::InvalidKeyEncoding(msg) => write!(f, "Invalid key encoding: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            LedgerError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

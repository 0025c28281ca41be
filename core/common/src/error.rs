//! Common error types for KeyBridge.

use thiserror::Error;

/// Top-level error type for KeyBridge operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Search criteria were rejected before any lookup took place.
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    /// No entry satisfied the search criteria.
    #[error("Entry not found")]
    EntryNotFound,

    /// Vault container could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vault password was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Vault container is malformed or incompatible.
    #[error("Container format error: {0}")]
    Format(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for agent-verify.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the registry client.
#[derive(Debug, Error)]
pub enum Error {
    /// A remote read could not be completed (network, revert, bad response).
    #[error("rpc error: {0}")]
    Rpc(String),

    /// A remote read did not complete within the configured deadline.
    #[error("{call} timed out after {after:?}")]
    Timeout {
        /// The logical read that timed out.
        call: &'static str,
        /// The deadline that elapsed.
        after: Duration,
    },

    /// A remote value did not fit the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// No record exists for the requested identifier or address.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid configuration (endpoint, contract address, config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading or writing a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

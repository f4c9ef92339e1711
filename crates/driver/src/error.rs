//! Error types for the automation driver

use thiserror::Error;

/// Result type alias using the driver Error
pub type Result<T> = std::result::Result<T, Error>;

/// Driver error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("timed out after {elapsed_ms}ms waiting for {waited_for}")]
    Timeout { waited_for: String, elapsed_ms: u64 },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command {name} expects at least {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("remote protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error is a wait-engine timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

//! Error types for qa2oie.

use thiserror::Error;

/// Result type for qa2oie operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for qa2oie operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Annotation stream does not match the expected record structure.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

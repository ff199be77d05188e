//! Error types for the update handler.
//!
//! Every failure on the write path collapses into one of two kinds: a
//! validation failure reported back to the caller as 400, or an unexpected
//! failure reported as 500 and logged.

use thiserror::Error;

use crate::storage::StoreError;

/// Result type alias for write-path operations.
pub type Result<T> = std::result::Result<T, HandlerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Malformed or incomplete input.
    #[error("{0}")]
    Validation(String),

    /// Any parse, serialization or store failure that is not a validation failure.
    #[error("{0}")]
    Unexpected(String),
}

impl HandlerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status the gateway should see for this error
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unexpected(_) => 500,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

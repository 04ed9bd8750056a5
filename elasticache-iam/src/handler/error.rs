//! Handler error types.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::signer::SigningError;
use crate::store::ConnectionError;

/// Everything that can make a handler invocation fail.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Required settings missing or malformed; nothing was attempted.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The IAM token could not be signed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// The cache could not be reached, rejected the token, or a command failed.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The dataset could not be serialised.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse category of a [`HandlerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Signing,
    Connection,
    Serialization,
}

impl HandlerError {
    /// The error's category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandlerError::Configuration(_) => ErrorKind::Configuration,
            HandlerError::Signing(_) => ErrorKind::Signing,
            HandlerError::Connection(_) => ErrorKind::Connection,
            HandlerError::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

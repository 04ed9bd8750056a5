//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling configuration or an identity.
///
/// These always fail fast: no signing or network call happens once one of
/// them has been returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required setting is absent or blank.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting is present but cannot be parsed.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The configuration file could not be read.
    #[error("failed to read config file {}: {reason}", path.display())]
    File { path: PathBuf, reason: String },
}

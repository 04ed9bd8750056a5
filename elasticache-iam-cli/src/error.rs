//! CLI error type.

use std::fmt;

use elasticache_iam::config::ConfigurationError;
use elasticache_iam::logging::LoggingError;
use elasticache_iam::signer::SigningError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is incomplete.
    Config(ConfigurationError),

    /// Credentials could not be signed.
    Signing(SigningError),

    /// Logging could not be initialised.
    Logging(LoggingError),

    /// The async runtime could not be started.
    Runtime(String),

    /// The handler returned a non-success status.
    Invocation(u16),

    /// Output could not be produced.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Signing(e) => write!(f, "Signing error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to start runtime: {}", msg),
            CliError::Invocation(status) => {
                write!(f, "Handler returned status {}", status)
            }
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Signing(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Runtime(_) | CliError::Invocation(_) | CliError::Output(_) => None,
        }
    }
}

impl From<ConfigurationError> for CliError {
    fn from(e: ConfigurationError) -> Self {
        CliError::Config(e)
    }
}

impl From<SigningError> for CliError {
    fn from(e: SigningError) -> Self {
        CliError::Signing(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing to stderr and, optionally,
//! to a log file through a non-blocking appender. `RUST_LOG` overrides the
//! default level.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging options.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Default to debug-level output for this crate.
    pub verbose: bool,
    /// Also append logs to this file.
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    /// The filter directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "info,elasticache_iam=debug"
        } else {
            "warn,elasticache_iam=info"
        }
    }
}

/// Errors from installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file location is unusable.
    #[error("invalid log file path: {0}")]
    InvalidPath(PathBuf),

    /// A global subscriber is already installed.
    #[error("failed to install logger: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// Returns the file writer's guard when a log file is configured; keep it
/// alive for the life of the process or buffered lines may be lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match &config.log_file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;
            Ok(None)
        }
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}

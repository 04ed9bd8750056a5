//! Common helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use elasticache_iam::config::{ConfigSource, ConfigurationError};

/// Name of the config file inside the platform config directory.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "elasticache-iam";

/// Default config file location, e.g. `~/.config/elasticache-iam/config.ini`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Build the configuration source for a command.
///
/// Environment variables always apply. An explicit `--config` file must
/// exist; the default file is only used if present.
pub fn config_source(explicit: Option<&Path>) -> Result<ConfigSource, ConfigurationError> {
    let source = ConfigSource::from_env();

    match explicit {
        Some(path) => source.with_file(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => source.with_file(&path),
            _ => Ok(source),
        },
    }
}

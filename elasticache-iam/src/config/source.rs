//! Layered lookup of configuration values.

use std::collections::HashMap;
use std::path::Path;

use ini::Ini;
use tracing::debug;

use super::error::ConfigurationError;
use super::settings::{
    ENV_REDIS_AUTH, ENV_REDIS_CACHE_NAME, ENV_REDIS_HOST, ENV_REDIS_PORT, ENV_REDIS_REGION,
    ENV_REDIS_SERVERLESS,
};

/// INI section holding the cache settings.
pub const INI_SECTION: &str = "redis";

/// INI key → environment variable name.
const INI_KEYS: &[(&str, &str)] = &[
    ("host", ENV_REDIS_HOST),
    ("port", ENV_REDIS_PORT),
    ("auth", ENV_REDIS_AUTH),
    ("cache_name", ENV_REDIS_CACHE_NAME),
    ("region", ENV_REDIS_REGION),
    ("serverless", ENV_REDIS_SERVERLESS),
];

/// Source of configuration values, keyed by environment variable name.
///
/// Lookups consult the process environment first (when enabled) and then
/// the explicit values, which come from [`ConfigSource::from_pairs`] or an
/// INI file. Blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    use_env: bool,
    values: HashMap<String, String>,
}

impl ConfigSource {
    /// Source backed by the process environment.
    pub fn from_env() -> Self {
        Self {
            use_env: true,
            values: HashMap::new(),
        }
    }

    /// Source backed only by the given pairs; the environment is ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            use_env: false,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Layer the `[redis]` section of an INI file underneath this source.
    ///
    /// Values already present in the source are kept.
    pub fn with_file(mut self, path: &Path) -> Result<Self, ConfigurationError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigurationError::File {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let Some(section) = ini.section(Some(INI_SECTION)) else {
            debug!(path = %path.display(), "Config file has no [redis] section");
            return Ok(self);
        };

        for (ini_key, env_key) in INI_KEYS {
            if let Some(value) = section.get(*ini_key) {
                self.values
                    .entry(env_key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(self)
    }

    /// Look up `key`, returning `None` when absent or blank.
    pub fn get(&self, key: &str) -> Option<String> {
        let from_env = if self.use_env {
            std::env::var(key).ok()
        } else {
            None
        };

        from_env
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.values
                    .get(key)
                    .filter(|v| !v.trim().is_empty())
                    .cloned()
            })
            .map(|v| v.trim().to_string())
    }
}

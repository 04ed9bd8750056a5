//! Resolved cache connection settings.

use super::error::ConfigurationError;
use super::source::ConfigSource;
use crate::credentials::Identity;
use crate::store::Endpoint;

/// Cache endpoint host name.
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
/// Cache endpoint port.
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";
/// IAM-enabled cache user id.
pub const ENV_REDIS_AUTH: &str = "REDIS_AUTH";
/// Cache resource name (replication group or serverless cache name).
pub const ENV_REDIS_CACHE_NAME: &str = "REDIS_CACHE_NAME";
/// Region the token is signed for.
pub const ENV_REDIS_REGION: &str = "REDIS_REGION";
/// Whether the cache is serverless.
pub const ENV_REDIS_SERVERLESS: &str = "REDIS_SERVERLESS";
/// Region fallback shared with the AWS SDK.
pub const ENV_AWS_REGION: &str = "AWS_REGION";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Everything needed to authenticate to and reach one cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Endpoint host name.
    pub host: String,
    /// Endpoint port.
    pub port: u16,
    /// Cache user id the token is issued for.
    pub auth_user: String,
    /// Cache resource name signed into the token.
    pub cache_name: String,
    /// Signing region.
    pub region: String,
    /// Whether the cache uses the serverless topology.
    pub serverless: bool,
}

impl CacheConfig {
    /// Resolve settings from a [`ConfigSource`].
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::Missing`] if host, auth user, port or cache name
    /// is absent; [`ConfigurationError::Invalid`] if port or the serverless
    /// flag cannot be parsed.
    pub fn from_source(source: &ConfigSource) -> Result<Self, ConfigurationError> {
        let host = required(source, ENV_REDIS_HOST)?;
        let auth_user = required(source, ENV_REDIS_AUTH)?;
        let port = required(source, ENV_REDIS_PORT)?;
        let cache_name = required(source, ENV_REDIS_CACHE_NAME)?;

        let port = port.parse::<u16>().map_err(|e| ConfigurationError::Invalid {
            key: ENV_REDIS_PORT,
            reason: format!("'{}': {}", port, e),
        })?;

        let region = source
            .get(ENV_REDIS_REGION)
            .or_else(|| source.get(ENV_AWS_REGION))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let serverless = match source.get(ENV_REDIS_SERVERLESS) {
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigurationError::Invalid {
                key: ENV_REDIS_SERVERLESS,
                reason: format!("'{}' is not a boolean", value),
            })?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            auth_user,
            cache_name,
            region,
            serverless,
        })
    }

    /// Read settings straight from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_source(&ConfigSource::from_env())
    }

    /// The signing identity described by these settings.
    pub fn identity(&self) -> Result<Identity, ConfigurationError> {
        Identity::new(
            &self.auth_user,
            &self.cache_name,
            self.serverless,
            &self.region,
        )
    }

    /// The network endpoint of the cache.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.host, self.port)
    }
}

fn required(source: &ConfigSource, key: &'static str) -> Result<String, ConfigurationError> {
    source.get(key).ok_or(ConfigurationError::Missing(key))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

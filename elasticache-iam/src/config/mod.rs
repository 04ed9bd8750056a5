//! Configuration for the cache-aside handler.
//!
//! Settings come from environment variables, optionally layered over an INI
//! file. Environment values always win. See [`CacheConfig`] for the keys.
//!
//! ```ignore
//! use elasticache_iam::config::{CacheConfig, ConfigSource};
//!
//! let source = ConfigSource::from_env().with_file("config.ini".as_ref())?;
//! let config = CacheConfig::from_source(&source)?;
//! ```

mod error;
mod settings;
mod source;

pub use error::ConfigurationError;
pub use settings::{
    CacheConfig, DEFAULT_REGION, ENV_AWS_REGION, ENV_REDIS_AUTH, ENV_REDIS_CACHE_NAME,
    ENV_REDIS_HOST, ENV_REDIS_PORT, ENV_REDIS_REGION, ENV_REDIS_SERVERLESS,
};
pub use source::{ConfigSource, INI_SECTION};

//! The identity a token is signed for.

use crate::config::ConfigurationError;

/// Who is connecting, to which cache, in which region.
///
/// Immutable once built. Also used as the key of a
/// [`TokenRegistry`](crate::token::TokenRegistry), so two equal identities
/// share one cached token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    username: String,
    cache_name: String,
    serverless: bool,
    region: String,
}

impl Identity {
    /// Build an identity, rejecting blank fields.
    pub fn new(
        username: &str,
        cache_name: &str,
        serverless: bool,
        region: &str,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            username: non_blank(username, "username")?,
            cache_name: non_blank(cache_name, "cache name")?,
            serverless,
            region: non_blank(region, "region")?,
        })
    }

    /// The cache user id.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The cache resource name.
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Whether the cache is serverless.
    pub fn is_serverless(&self) -> bool {
        self.serverless
    }

    /// The signing region.
    pub fn region(&self) -> &str {
        &self.region
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<String, ConfigurationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::Missing(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_accessors() {
        let identity = Identity::new("user", "cache", false, "us-west-2").unwrap();
        assert_eq!(identity.username(), "user");
        assert_eq!(identity.cache_name(), "cache");
        assert!(!identity.is_serverless());
        assert_eq!(identity.region(), "us-west-2");
    }

    #[test]
    fn test_identity_rejects_blank_fields() {
        assert_eq!(
            Identity::new("", "cache", true, "us-east-1"),
            Err(ConfigurationError::Missing("username"))
        );
        assert_eq!(
            Identity::new("user", "  ", true, "us-east-1"),
            Err(ConfigurationError::Missing("cache name"))
        );
        assert_eq!(
            Identity::new("user", "cache", true, ""),
            Err(ConfigurationError::Missing("region"))
        );
    }

    #[test]
    fn test_topology_distinguishes_identities() {
        let a = Identity::new("user", "cache", true, "us-east-1").unwrap();
        let b = Identity::new("user", "cache", false, "us-east-1").unwrap();
        assert_ne!(a, b);
    }
}

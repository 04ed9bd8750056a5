//! IAM credential provider.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::identity::Identity;
use crate::signer::{ConnectRequest, RequestSigner, SigningError, SIGNING_SCHEME, TOKEN_EXPIRY};
use crate::token::{TokenCache, TokenRegistry};

/// A username and the IAM token to authenticate it with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The cache user id.
    pub username: String,
    /// Presigned connect URL without its scheme, used as the password.
    pub token: String,
}

// Keeps the token out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Produces ElastiCache IAM credentials for one identity.
///
/// Tokens are presigned `connect` URLs. They are cached for their validity
/// window, so repeated connection attempts only sign once per window.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use elasticache_iam::credentials::{IamCredentialProvider, Identity};
/// use elasticache_iam::signer::SigV4Signer;
///
/// let identity = Identity::new("app-user", "my-cache", true, "us-east-1")?;
/// let signer = Arc::new(SigV4Signer::from_env().await?);
/// let provider = IamCredentialProvider::new(identity, signer);
///
/// let credentials = provider.get_credentials().await?;
/// // AUTH credentials.username credentials.token
/// ```
pub struct IamCredentialProvider {
    identity: Identity,
    signer: Arc<dyn RequestSigner>,
    cache: Arc<TokenCache>,
}

impl IamCredentialProvider {
    /// Create a provider with its own empty token cache.
    pub fn new(identity: Identity, signer: Arc<dyn RequestSigner>) -> Self {
        Self::with_cache(identity, signer, Arc::new(TokenCache::new()))
    }

    /// Create a provider around an existing token cache.
    pub fn with_cache(
        identity: Identity,
        signer: Arc<dyn RequestSigner>,
        cache: Arc<TokenCache>,
    ) -> Self {
        Self {
            identity,
            signer,
            cache,
        }
    }

    /// Create a provider whose token cache lives in `registry`.
    ///
    /// Providers built this way for equal identities share one cached token.
    pub async fn with_registry(
        identity: Identity,
        signer: Arc<dyn RequestSigner>,
        registry: &TokenRegistry,
    ) -> Self {
        let cache = registry.slot(&identity).await;
        Self::with_cache(identity, signer, cache)
    }

    /// The identity this provider signs for.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The underlying token cache.
    pub fn token_cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Current credentials, signing a new token only if the cached one expired.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] if the connect request cannot be built or
    /// signed. Nothing is retried, and a failure never replaces a previously
    /// cached token.
    pub async fn get_credentials(&self) -> Result<Credentials, SigningError> {
        let token = self
            .cache
            .get_or_compute(|| self.sign_connect_request())
            .await?;

        Ok(Credentials {
            username: self.identity.username().to_string(),
            token: strip_scheme(token.url()).to_string(),
        })
    }

    /// Issuance time of the cached token, if one has been signed.
    pub async fn last_issued_at(&self) -> Option<DateTime<Utc>> {
        self.cache.peek().await.map(|token| token.issued_at())
    }

    async fn sign_connect_request(&self) -> Result<String, SigningError> {
        let request = ConnectRequest::new(
            self.identity.cache_name(),
            self.identity.username(),
            self.identity.is_serverless(),
        )?;

        debug!(
            user = self.identity.username(),
            cache = self.identity.cache_name(),
            serverless = self.identity.is_serverless(),
            region = self.identity.region(),
            "Signing connect request"
        );

        self.signer
            .presign(&request, TOKEN_EXPIRY, self.identity.region())
            .await
    }
}

impl fmt::Debug for IamCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamCredentialProvider")
            .field("identity", &self.identity)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Remove the literal `https://` prefix the signer needs but the cache rejects.
fn strip_scheme(url: &str) -> &str {
    url.strip_prefix(SIGNING_SCHEME)
        .and_then(|rest| rest.strip_prefix("://"))
        .unwrap_or(url)
}

//! Core signer types: the request description, the signer trait and its errors.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Scheme the signer requires on the request URL.
pub const SIGNING_SCHEME: &str = "https";

/// Service name the connect request is signed for.
pub const SERVICE_NAME: &str = "elasticache";

/// Operation name of the connect request.
pub const OPERATION_NAME: &str = "connect";

/// Lifetime of a presigned connect URL.
pub const TOKEN_EXPIRY: Duration = Duration::from_secs(900);

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors raised while producing a signed URL.
///
/// None of these are retried by this crate; they propagate to the caller
/// of [`IamCredentialProvider::get_credentials`](crate::credentials::IamCredentialProvider::get_credentials).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The session has no credentials provider configured.
    #[error("no AWS credentials provider configured")]
    NoCredentialsProvider,

    /// The credentials provider failed to produce credentials.
    #[error("failed to resolve AWS credentials: {0}")]
    Credentials(String),

    /// The request description could not be turned into a signable request.
    #[error("invalid request for signing: {0}")]
    InvalidRequest(String),

    /// The signature itself could not be computed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Description of the `connect` request that gets presigned.
///
/// Built fresh for every signing attempt. The method is always `GET` with an
/// empty body and no extra headers, so only the URL is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    url: Url,
}

impl ConnectRequest {
    /// HTTP method of every connect request.
    pub const METHOD: &'static str = "GET";

    /// Build the connect request for `user` against `cache_name`.
    ///
    /// Query parameters are `Action=connect`, `User=<user>` and, for
    /// serverless caches only, `ResourceType=ServerlessCache`, in that order.
    pub fn new(cache_name: &str, user: &str, serverless: bool) -> Result<Self, SigningError> {
        let mut url = Url::parse(&format!("{}://{}/", SIGNING_SCHEME, cache_name))
            .map_err(|e| SigningError::InvalidRequest(format!("{}: {}", cache_name, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("Action", OPERATION_NAME);
            query.append_pair("User", user);
            if serverless {
                query.append_pair("ResourceType", "ServerlessCache");
            }
        }

        Ok(Self { url })
    }

    /// HTTP method.
    pub fn method(&self) -> &'static str {
        Self::METHOD
    }

    /// Full request URL including scheme.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host component (the cache resource name).
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Encoded query string without the leading `?`.
    pub fn query(&self) -> &str {
        self.url.query().unwrap_or_default()
    }
}

/// Produces presigned URLs for connect requests.
///
/// Implementations are stateless transforms; caching belongs to
/// [`TokenCache`](crate::token::TokenCache).
pub trait RequestSigner: Send + Sync {
    /// Presign `request` for `region`, valid for `expires_in`.
    ///
    /// Returns the signed absolute URL, still carrying its `https://` scheme.
    fn presign<'a>(
        &'a self,
        request: &'a ConnectRequest,
        expires_in: Duration,
        region: &'a str,
    ) -> BoxFuture<'a, Result<String, SigningError>>;
}

//! SigV4 presigner backed by the AWS SDK.
//!
//! Credentials come from the standard AWS provider chain (environment,
//! profile, web identity, container or instance metadata). The signature is
//! placed in the query string, producing a presigned URL of the form:
//!
//! ```text
//! https://<cache>/?Action=connect&User=<user>&X-Amz-Algorithm=AWS4-HMAC-SHA256&...&X-Amz-Signature=<hex>
//! ```

use std::time::{Duration, SystemTime};

use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SignatureLocation, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use tracing::debug;
use url::Url;

use super::types::{BoxFuture, ConnectRequest, RequestSigner, SigningError, SERVICE_NAME};

/// Presigns connect requests with SigV4.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: SharedCredentialsProvider,
}

impl SigV4Signer {
    /// Create a signer around an existing credentials provider.
    pub fn new(credentials: SharedCredentialsProvider) -> Self {
        Self { credentials }
    }

    /// Create a signer from an already loaded SDK configuration.
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Result<Self, SigningError> {
        let credentials = config
            .credentials_provider()
            .ok_or(SigningError::NoCredentialsProvider)?;
        Ok(Self::new(credentials))
    }

    /// Create a signer using the default AWS provider chain.
    pub async fn from_env() -> Result<Self, SigningError> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_sdk_config(&config)
    }

    async fn sign_url(
        &self,
        request: &ConnectRequest,
        expires_in: Duration,
        region: &str,
    ) -> Result<String, SigningError> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| SigningError::Credentials(e.to_string()))?;
        let identity = credentials.into();

        let mut settings = SigningSettings::default();
        settings.signature_location = SignatureLocation::QueryParams;
        settings.expires_in = Some(expires_in);

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(region)
            .name(SERVICE_NAME)
            .time(SystemTime::now())
            .settings(settings)
            .build()
            .map_err(|e| SigningError::InvalidRequest(e.to_string()))?
            .into();

        let signable = SignableRequest::new(
            request.method(),
            request.url().as_str(),
            std::iter::empty(),
            SignableBody::Bytes(&[]),
        )
        .map_err(|e| SigningError::InvalidRequest(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(|e| SigningError::Signing(e.to_string()))?
            .into_parts();

        let (_headers, query_params) = instructions.into_parts();
        let signed = append_query(
            request.url(),
            query_params.iter().map(|(k, v)| (*k, &**v)),
        );

        debug!(
            host = request.host(),
            region,
            expires_in_secs = expires_in.as_secs(),
            "Presigned connect request"
        );

        Ok(signed.into())
    }
}

impl RequestSigner for SigV4Signer {
    fn presign<'a>(
        &'a self,
        request: &'a ConnectRequest,
        expires_in: Duration,
        region: &'a str,
    ) -> BoxFuture<'a, Result<String, SigningError>> {
        Box::pin(self.sign_url(request, expires_in, region))
    }
}

/// Append signature parameters after the request's own query parameters.
fn append_query<'a>(url: &Url, params: impl Iterator<Item = (&'a str, &'a str)>) -> Url {
    let mut signed = url.clone();
    signed.query_pairs_mut().extend_pairs(params);
    signed
}

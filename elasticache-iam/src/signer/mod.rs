//! Signer adapter for ElastiCache IAM authentication.
//!
//! This module turns a [`ConnectRequest`] into a presigned URL. The
//! [`RequestSigner`] trait is the seam: production code uses
//! [`SigV4Signer`], tests inject a mock that records what it was asked to sign.
//!
//! ```ignore
//! use elasticache_iam::signer::{ConnectRequest, RequestSigner, SigV4Signer, TOKEN_EXPIRY};
//!
//! let signer = SigV4Signer::from_env().await?;
//! let request = ConnectRequest::new("my-cache", "app-user", true)?;
//! let url = signer.presign(&request, TOKEN_EXPIRY, "us-east-1").await?;
//! ```

mod sigv4;
mod types;

pub use sigv4::SigV4Signer;
pub use types::{
    BoxFuture, ConnectRequest, RequestSigner, SigningError, OPERATION_NAME, SERVICE_NAME,
    SIGNING_SCHEME, TOKEN_EXPIRY,
};

#[cfg(test)]
pub use mock::MockSigner;

#[cfg(test)]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::{BoxFuture, ConnectRequest, RequestSigner, SigningError};

    /// Mock signer that records requests and returns numbered signatures.
    #[derive(Default)]
    pub struct MockSigner {
        pub calls: AtomicUsize,
        pub requests: Mutex<Vec<(String, Duration, String)>>,
        pub fail_with: Mutex<Option<SigningError>>,
        pub delay: Option<Duration>,
    }

    impl MockSigner {
        pub fn failing(error: SigningError) -> Self {
            Self {
                fail_with: Mutex::new(Some(error)),
                ..Default::default()
            }
        }

        pub fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RequestSigner for MockSigner {
        fn presign<'a>(
            &'a self,
            request: &'a ConnectRequest,
            expires_in: Duration,
            region: &'a str,
        ) -> BoxFuture<'a, Result<String, SigningError>> {
            Box::pin(async move {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                self.requests.lock().push((
                    request.url().to_string(),
                    expires_in,
                    region.to_string(),
                ));
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                if let Some(err) = self.fail_with.lock().clone() {
                    return Err(err);
                }
                Ok(format!("{}&X-Amz-Signature=sig{}", request.url(), n))
            })
        }
    }
}

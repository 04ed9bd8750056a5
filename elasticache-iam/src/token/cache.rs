//! Single-slot, time-bounded memo for signed tokens.
//!
//! A [`TokenCache`] holds at most one [`SignedToken`]. Callers go through
//! [`TokenCache::get_or_compute`], which returns the stored token while it is
//! still inside the validity window and otherwise runs the supplied producer.
//!
//! # Concurrency
//!
//! The slot sits behind a `tokio::sync::Mutex` that is held for the whole
//! miss path, including the producer. Concurrent callers on a miss therefore
//! queue behind one in-flight signing and then read the stored result. The
//! slot is only ever replaced with a complete token, and a failed or cancelled
//! producer leaves the previous contents untouched.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};

/// How long a signed token may be reused after issuance.
pub const DEFAULT_VALIDITY: TimeDelta = TimeDelta::seconds(900);

/// A presigned URL together with the time it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    url: String,
    issued_at: DateTime<Utc>,
}

impl SignedToken {
    /// Create a token issued at `issued_at`.
    pub fn new(url: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            issued_at,
        }
    }

    /// The raw signed URL, including its scheme.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// When the token was issued.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Whether the token may still be reused at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, validity: TimeDelta) -> bool {
        now.signed_duration_since(self.issued_at) < validity
    }
}

/// Hit/miss counters for a token cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCacheStats {
    /// Lookups answered from the stored token.
    pub hits: u64,
    /// Lookups that ran the producer and stored its result.
    pub misses: u64,
    /// Producer runs that returned an error.
    pub failures: u64,
}

/// Time-to-live bounded memo for one signed token.
pub struct TokenCache {
    slot: Mutex<Option<SignedToken>>,
    validity: TimeDelta,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

impl TokenCache {
    /// Create an empty cache with the default 900 second validity.
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_VALIDITY, Arc::new(SystemClock))
    }

    /// Create an empty cache with a custom validity window and clock.
    pub fn with_clock(validity: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            validity,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Return the stored token if fresh, otherwise produce and store a new one.
    ///
    /// The issuance time is read from the clock just before `producer` runs,
    /// so the cached expiry never extends past the signature's own expiry.
    ///
    /// # Errors
    ///
    /// Returns whatever error the producer returns. The stored token is left
    /// as it was.
    pub async fn get_or_compute<F, Fut, E>(&self, producer: F) -> Result<SignedToken, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();

        if let Some(token) = slot.as_ref() {
            if token.is_fresh(now, self.validity) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(issued_at = %token.issued_at, "Token cache hit");
                return Ok(token.clone());
            }
            debug!(issued_at = %token.issued_at, "Cached token expired");
        }

        let url = match producer().await {
            Ok(url) => url,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let token = SignedToken::new(url, now);
        *slot = Some(token.clone());
        self.misses.fetch_add(1, Ordering::Relaxed);
        info!(issued_at = %now, "Issued new IAM token");

        Ok(token)
    }

    /// The stored token, fresh or not, without touching the counters.
    pub async fn peek(&self) -> Option<SignedToken> {
        self.slot.lock().await.clone()
    }

    /// Drop the stored token so the next lookup signs again.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// The configured validity window.
    pub fn validity(&self) -> TimeDelta {
        self.validity
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> TokenCacheStats {
        TokenCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("validity", &self.validity)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

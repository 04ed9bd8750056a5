//! In-process key-value store using moka.
//!
//! Stands in for the cache service in tests and local runs. Entries are
//! weighted by value size and bounded by a byte budget, like a real cache
//! node with `maxmemory` set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::future::Cache as MokaCache;
use parking_lot::Mutex;

use super::traits::{ConnectionError, Endpoint, KeyValueStore, StoreConnector};
use crate::credentials::Credentials;
use crate::signer::BoxFuture;

/// Default byte budget of a [`MemoryStore`].
pub const DEFAULT_MEMORY_STORE_BYTES: u64 = 64 * 1024 * 1024;

/// Size-bounded in-memory key-value store.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct MemoryStore {
    entries: MokaCache<String, String>,
}

impl MemoryStore {
    /// Create a store bounded to `max_size_bytes` of values.
    pub fn new(max_size_bytes: u64) -> Self {
        let entries = MokaCache::builder()
            .weigher(|_key: &String, value: &String| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes)
            .build();

        Self { entries }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_STORE_BYTES)
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, ConnectionError>> {
        Box::pin(async move { Ok(self.entries.get(key).await) })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> BoxFuture<'a, Result<(), ConnectionError>> {
        Box::pin(async move {
            self.entries.insert(key.to_string(), value).await;
            Ok(())
        })
    }
}

/// Connector that hands out connections to a shared [`MemoryStore`].
///
/// Counts connection attempts and remembers the last username it saw, so
/// tests can assert whether (and as whom) the handler connected. It can be
/// told to reject every attempt to simulate an auth failure.
pub struct MemoryConnector {
    store: MemoryStore,
    attempts: AtomicU64,
    last_username: Mutex<Option<String>>,
    reject_auth: bool,
}

impl MemoryConnector {
    /// Connector over `store` that accepts any credentials.
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            attempts: AtomicU64::new(0),
            last_username: Mutex::new(None),
            reject_auth: false,
        }
    }

    /// Connector that rejects every authentication attempt.
    pub fn rejecting(store: MemoryStore) -> Self {
        Self {
            reject_auth: true,
            ..Self::new(store)
        }
    }

    /// The store behind this connector.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// How many times `connect` was called.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Username presented on the most recent connection attempt.
    pub fn last_username(&self) -> Option<String> {
        self.last_username.lock().clone()
    }
}

impl StoreConnector for MemoryConnector {
    fn connect<'a>(
        &'a self,
        endpoint: &'a Endpoint,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Box<dyn KeyValueStore>, ConnectionError>> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            *self.last_username.lock() = Some(credentials.username.clone());

            if self.reject_auth || credentials.token.is_empty() {
                return Err(ConnectionError::AuthRejected {
                    endpoint: endpoint.to_string(),
                    reason: "WRONGPASS invalid username-password pair".to_string(),
                });
            }

            Ok(Box::new(self.store.clone()) as Box<dyn KeyValueStore>)
        })
    }
}

//! Identity-keyed registry of token caches.
//!
//! A warm process may serve several identities. Each identity gets its own
//! [`TokenCache`] slot, and the registry is bounded with moka so the number of
//! identities it remembers cannot grow without limit. Slots that go unused
//! for a full validity window are dropped, since their token would be expired
//! anyway.

use std::sync::Arc;

use chrono::TimeDelta;
use moka::future::Cache as MokaCache;

use super::cache::{TokenCache, DEFAULT_VALIDITY};
use crate::clock::{Clock, SystemClock};
use crate::credentials::Identity;

/// Default number of identities a registry remembers.
pub const DEFAULT_REGISTRY_CAPACITY: u64 = 128;

/// Bounded map from [`Identity`] to its shared [`TokenCache`].
#[derive(Clone)]
pub struct TokenRegistry {
    slots: MokaCache<Identity, Arc<TokenCache>>,
    validity: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenRegistry {
    /// Create a registry holding up to `capacity` identities.
    pub fn new(capacity: u64) -> Self {
        Self::with_clock(capacity, DEFAULT_VALIDITY, Arc::new(SystemClock))
    }

    /// Create a registry whose slots use a custom validity window and clock.
    pub fn with_clock(capacity: u64, validity: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut builder = MokaCache::builder().max_capacity(capacity);
        if let Ok(idle) = validity.to_std() {
            builder = builder.time_to_idle(idle);
        }

        Self {
            slots: builder.build(),
            validity,
            clock,
        }
    }

    /// The token cache for `identity`, created empty on first use.
    pub async fn slot(&self, identity: &Identity) -> Arc<TokenCache> {
        let validity = self.validity;
        let clock = self.clock.clone();
        self.slots
            .get_with_by_ref(identity, async move {
                Arc::new(TokenCache::with_clock(validity, clock))
            })
            .await
    }

    /// Number of identities currently tracked.
    ///
    /// Moka applies inserts and evictions lazily, so this is approximate
    /// until [`run_pending_tasks`](Self::run_pending_tasks) has been awaited.
    pub fn len(&self) -> u64 {
        self.slots.entry_count()
    }

    /// Whether no identities are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending inserts and evictions.
    pub async fn run_pending_tasks(&self) {
        self.slots.run_pending_tasks().await;
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}

impl std::fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("entries", &self.slots.entry_count())
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user: &str) -> Identity {
        Identity::new(user, "my-cache", true, "us-east-1").unwrap()
    }

    #[tokio::test]
    async fn test_same_identity_shares_slot() {
        let registry = TokenRegistry::default();
        let a = registry.slot(&identity("alice")).await;
        let b = registry.slot(&identity("alice")).await;
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_distinct_identities_get_distinct_slots() {
        let registry = TokenRegistry::default();
        let a = registry.slot(&identity("alice")).await;
        let b = registry.slot(&identity("bob")).await;
        assert!(!Arc::ptr_eq(&a, &b));

        registry.run_pending_tasks().await;
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_registry_is_bounded() {
        let registry = TokenRegistry::new(4);
        for i in 0..64 {
            registry.slot(&identity(&format!("user{}", i))).await;
        }
        registry.run_pending_tasks().await;
        assert!(registry.len() <= 4);
    }

    #[tokio::test]
    async fn test_slots_inherit_validity() {
        let registry =
            TokenRegistry::with_clock(8, TimeDelta::seconds(60), Arc::new(SystemClock));
        let slot = registry.slot(&identity("alice")).await;
        assert_eq!(slot.validity(), TimeDelta::seconds(60));
    }
}

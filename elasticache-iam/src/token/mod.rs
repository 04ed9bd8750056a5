//! Token caching.
//!
//! Signing is comparatively expensive and rate-sensitive, so signed tokens
//! are reused for as long as they remain valid:
//!
//! - [`TokenCache`]: one slot, one identity, 900 second validity window
//! - [`TokenRegistry`]: bounded identity → slot map for processes that serve
//!   several identities

mod cache;
mod registry;

pub use cache::{SignedToken, TokenCache, TokenCacheStats, DEFAULT_VALIDITY};
pub use registry::{TokenRegistry, DEFAULT_REGISTRY_CAPACITY};

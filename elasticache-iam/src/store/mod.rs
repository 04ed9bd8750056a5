//! Cache service access.
//!
//! - [`KeyValueStore`] / [`StoreConnector`]: the `GET`/`SET` surface the
//!   handler consumes and the authenticated connect step
//! - [`RedisConnector`]: Redis/Valkey over TCP with IAM `AUTH`
//! - [`MemoryConnector`]: in-process moka store for tests and local runs

mod memory;
mod redis;
mod traits;

pub use self::redis::{RedisConnector, RedisStore, DEFAULT_CONNECT_TIMEOUT};
pub use memory::{MemoryConnector, MemoryStore, DEFAULT_MEMORY_STORE_BYTES};
pub use traits::{ConnectionError, Endpoint, KeyValueStore, StoreConnector};

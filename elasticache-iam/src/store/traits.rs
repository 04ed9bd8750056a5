//! Cache service interface.
//!
//! The handler only needs two commands, `GET` and `SET`, plus a way to open an
//! authenticated connection. Both seams are traits so the Redis backend can be
//! swapped for an in-process store in tests.

use std::fmt;

use thiserror::Error;

use crate::credentials::Credentials;
use crate::signer::BoxFuture;

/// Errors from connecting to or talking to the cache service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    /// The endpoint could not be reached.
    #[error("failed to connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    /// The cache refused the supplied credentials.
    #[error("authentication rejected by {endpoint}: {reason}")]
    AuthRejected { endpoint: String, reason: String },

    /// The connection attempt did not finish in time.
    #[error("timed out connecting to {endpoint} after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// A command failed on an open connection.
    #[error("{command} failed: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },
}

/// Host and port of a cache endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// An open connection to a key-value cache.
pub trait KeyValueStore: Send + Sync {
    /// `GET key`. Returns `Ok(None)` when the key is absent.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, ConnectionError>>;

    /// `SET key value`, with no expiry.
    fn set<'a>(&'a self, key: &'a str, value: String)
        -> BoxFuture<'a, Result<(), ConnectionError>>;
}

/// Opens authenticated connections to a cache.
pub trait StoreConnector: Send + Sync {
    /// Connect to `endpoint` and authenticate with `credentials`.
    fn connect<'a>(
        &'a self,
        endpoint: &'a Endpoint,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Box<dyn KeyValueStore>, ConnectionError>>;
}

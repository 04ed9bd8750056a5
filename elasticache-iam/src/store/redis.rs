//! Redis/Valkey backend.
//!
//! Opens a multiplexed async connection and authenticates with
//! `AUTH <username> <iam-token>` as part of the handshake. The token is
//! requested right before connecting, so a reconnect after expiry picks up a
//! freshly signed one.

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, ErrorKind, RedisConnectionInfo};
use tracing::{debug, info};

use super::traits::{ConnectionError, Endpoint, KeyValueStore, StoreConnector};
use crate::credentials::Credentials;
use crate::signer::BoxFuture;

/// Default time allowed for connect plus AUTH.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects to Redis over plain TCP using IAM credentials.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    connect_timeout: Duration,
}

impl RedisConnector {
    /// Create a connector with the default connect timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a connector with a custom connect timeout.
    pub fn with_timeout(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    async fn open(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<Box<dyn KeyValueStore>, ConnectionError> {
        let client = redis::Client::open(connection_info(endpoint, credentials))
            .map_err(|e| connect_error(endpoint, e))?;

        let connection = tokio::time::timeout(
            self.connect_timeout,
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| ConnectionError::Timeout {
            endpoint: endpoint.to_string(),
            timeout_ms: self.connect_timeout.as_millis() as u64,
        })?
        .map_err(|e| connect_error(endpoint, e))?;

        info!(endpoint = %endpoint, user = %credentials.username, "Connected to cache");
        Ok(Box::new(RedisStore { connection }))
    }
}

impl Default for RedisConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConnector for RedisConnector {
    fn connect<'a>(
        &'a self,
        endpoint: &'a Endpoint,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Box<dyn KeyValueStore>, ConnectionError>> {
        Box::pin(self.open(endpoint, credentials))
    }
}

/// An authenticated Redis connection.
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl KeyValueStore for RedisStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, ConnectionError>> {
        Box::pin(async move {
            let mut connection = self.connection.clone();
            let value: Option<String> = connection
                .get(key)
                .await
                .map_err(|e| command_error("GET", e))?;
            debug!(key, hit = value.is_some(), "GET");
            Ok(value)
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> BoxFuture<'a, Result<(), ConnectionError>> {
        Box::pin(async move {
            let mut connection = self.connection.clone();
            let bytes = value.len();
            connection
                .set::<_, _, ()>(key, value)
                .await
                .map_err(|e| command_error("SET", e))?;
            debug!(key, bytes, "SET");
            Ok(())
        })
    }
}

fn connection_info(endpoint: &Endpoint, credentials: &Credentials) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(endpoint.host().to_string(), endpoint.port()),
        redis: RedisConnectionInfo {
            username: Some(credentials.username.clone()),
            password: Some(credentials.token.clone()),
            ..Default::default()
        },
    }
}

fn connect_error(endpoint: &Endpoint, error: redis::RedisError) -> ConnectionError {
    if error.kind() == ErrorKind::AuthenticationFailed {
        ConnectionError::AuthRejected {
            endpoint: endpoint.to_string(),
            reason: error.to_string(),
        }
    } else {
        ConnectionError::Connect {
            endpoint: endpoint.to_string(),
            reason: error.to_string(),
        }
    }
}

fn command_error(command: &'static str, error: redis::RedisError) -> ConnectionError {
    ConnectionError::Command {
        command,
        reason: error.to_string(),
    }
}

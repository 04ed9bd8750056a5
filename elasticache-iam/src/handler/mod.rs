//! Cache-aside request handler.
//!
//! Each invocation resolves configuration, obtains IAM credentials, connects
//! to the cache and serves the countries dataset with a read-through cache:
//!
//! ```text
//! invoke ──► CacheConfig ──► IamCredentialProvider ──► StoreConnector
//!                                                          │
//!              GET countries ◄─────────────────────────────┘
//!                 │ hit ──────────────────────────────► 200 + cached data
//!                 │ miss / malformed ──► generate ──► SET ──► 200 + data
//! ```
//!
//! Any failure becomes a bare 500; the cause only goes to the log.

mod countries;
mod error;
mod response;

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::{CacheConfig, ConfigSource};
use crate::credentials::IamCredentialProvider;
use crate::signer::RequestSigner;
use crate::store::{KeyValueStore, StoreConnector};
use crate::token::TokenRegistry;

pub use countries::{generate_countries, Country, COUNTRIES_KEY, COUNTRY_COUNT};
pub use error::{ErrorKind, HandlerError};
pub use response::HandlerResponse;

/// Serves the countries dataset through an IAM-authenticated cache.
///
/// The handler owns a [`TokenRegistry`], so when it is kept alive across
/// invocations (a warm function instance) the signed token is reused until
/// it expires.
pub struct CountriesHandler {
    signer: Arc<dyn RequestSigner>,
    connector: Arc<dyn StoreConnector>,
    registry: TokenRegistry,
}

impl CountriesHandler {
    /// Create a handler with a fresh token registry.
    pub fn new(signer: Arc<dyn RequestSigner>, connector: Arc<dyn StoreConnector>) -> Self {
        Self::with_registry(signer, connector, TokenRegistry::default())
    }

    /// Create a handler around an existing token registry.
    pub fn with_registry(
        signer: Arc<dyn RequestSigner>,
        connector: Arc<dyn StoreConnector>,
        registry: TokenRegistry,
    ) -> Self {
        Self {
            signer,
            connector,
            registry,
        }
    }

    /// Run one invocation and map the outcome to a response.
    pub async fn invoke(&self, source: &ConfigSource) -> HandlerResponse {
        match self.run(source).await {
            Ok(countries) => HandlerResponse::ok(countries),
            Err(e) => {
                error!(error = %e, kind = ?e.kind(), "Handler invocation failed");
                HandlerResponse::internal_error()
            }
        }
    }

    /// Run one invocation, surfacing the specific error.
    pub async fn run(&self, source: &ConfigSource) -> Result<Vec<Country>, HandlerError> {
        let config = CacheConfig::from_source(source)?;
        self.run_with_config(&config).await
    }

    /// Run one invocation against already resolved settings.
    pub async fn run_with_config(&self, config: &CacheConfig) -> Result<Vec<Country>, HandlerError> {
        let identity = config.identity()?;
        let endpoint = config.endpoint();
        debug!(endpoint = %endpoint, user = identity.username(), "Handling request");

        let provider =
            IamCredentialProvider::with_registry(identity, self.signer.clone(), &self.registry)
                .await;
        let credentials = provider.get_credentials().await?;
        let store = self.connector.connect(&endpoint, &credentials).await?;

        read_through(store.as_ref()).await
    }

    /// The handler's token registry.
    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }
}

/// Return the cached dataset, regenerating and storing it on a miss.
async fn read_through(store: &dyn KeyValueStore) -> Result<Vec<Country>, HandlerError> {
    if let Some(cached) = store.get(COUNTRIES_KEY).await? {
        match serde_json::from_str::<Vec<Country>>(&cached) {
            Ok(countries) => {
                debug!(key = COUNTRIES_KEY, records = countries.len(), "Cache hit");
                return Ok(countries);
            }
            Err(e) => {
                warn!(key = COUNTRIES_KEY, error = %e, "Cached value is malformed, regenerating");
            }
        }
    }

    let countries = generate_countries(COUNTRY_COUNT);
    let json = serde_json::to_string(&countries)?;
    store.set(COUNTRIES_KEY, json).await?;
    debug!(key = COUNTRIES_KEY, records = countries.len(), "Cache populated");

    Ok(countries)
}

//! `invoke` command: run the cache-aside handler once against a real cache.

use std::path::Path;
use std::sync::Arc;

use elasticache_iam::handler::CountriesHandler;
use elasticache_iam::signer::SigV4Signer;
use elasticache_iam::store::RedisConnector;
use tracing::info;

use super::common::config_source;
use crate::error::CliError;

/// Run the handler and print its JSON response.
///
/// Returns `CliError::Invocation` when the status is not 200, after the
/// response has been printed.
pub async fn run(config: Option<&Path>) -> Result<(), CliError> {
    let source = config_source(config)?;
    let signer = SigV4Signer::from_env().await?;
    let handler = CountriesHandler::new(Arc::new(signer), Arc::new(RedisConnector::new()));

    let response = handler.invoke(&source).await;
    info!(status = response.status_code, "Invocation finished");

    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| CliError::Output(e.to_string()))?;
    println!("{}", json);

    if response.is_success() {
        Ok(())
    } else {
        Err(CliError::Invocation(response.status_code))
    }
}

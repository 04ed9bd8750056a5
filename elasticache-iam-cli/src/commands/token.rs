//! `token` command: print the IAM credentials a client would send in AUTH.

use std::path::Path;
use std::sync::Arc;

use elasticache_iam::config::CacheConfig;
use elasticache_iam::credentials::IamCredentialProvider;
use elasticache_iam::signer::SigV4Signer;

use super::common::config_source;
use crate::error::CliError;

/// Sign a connect token for the configured identity and print it.
pub async fn run(config: Option<&Path>) -> Result<(), CliError> {
    let source = config_source(config)?;
    let settings = CacheConfig::from_source(&source)?;
    let signer = SigV4Signer::from_env().await?;

    let provider = IamCredentialProvider::new(settings.identity()?, Arc::new(signer));
    let credentials = provider.get_credentials().await?;

    println!("Endpoint: {}", settings.endpoint());
    println!("Username: {}", credentials.username);
    println!("Token:    {}", credentials.token);

    Ok(())
}

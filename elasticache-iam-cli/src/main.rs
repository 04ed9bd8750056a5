//! ElastiCache IAM CLI - Command-line interface
//!
//! Runs the cache-aside handler or prints a signed connect token, using the
//! same environment variables a deployed function would read.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use elasticache_iam::logging::{init_logging, LoggingConfig};

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "elasticache-iam")]
#[command(version, about = "IAM-authenticated access to ElastiCache", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the countries handler once and print the response
    Invoke {
        /// INI file with a [redis] section (defaults to the user config dir)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Sign a connect token and print the credentials
    Token {
        /// INI file with a [redis] section (defaults to the user config dir)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Invocation(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let logging = LoggingConfig {
        verbose: cli.verbose,
        log_file: cli.log_file,
    };
    let _guard = init_logging(&logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    runtime.block_on(async {
        match cli.command {
            Commands::Invoke { config } => commands::invoke::run(config.as_deref()).await,
            Commands::Token { config } => commands::token::run(config.as_deref()).await,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["elasticache-iam", "invoke", "-v", "--config", "x.ini"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Invoke { config: Some(ref p) } if p == &PathBuf::from("x.ini")
        ));
    }
}

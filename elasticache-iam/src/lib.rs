//! ElastiCache IAM - short-lived token authentication for managed caches
//!
//! This library authenticates a client to ElastiCache (Redis/Valkey) with
//! presigned SigV4 `connect` tokens instead of static passwords, and caches
//! each token for its 15 minute validity window so reconnects do not re-sign.
//!
//! # Modules
//!
//! - [`signer`]: presigns connect requests ([`signer::SigV4Signer`])
//! - [`token`]: time-bounded token cache and identity registry
//! - [`credentials`]: [`credentials::IamCredentialProvider`], the core
//! - [`store`]: cache service access (Redis and in-memory)
//! - [`handler`]: cache-aside handler serving an example dataset
//! - [`config`]: environment and INI configuration
//! - [`logging`]: tracing subscriber setup
//! - [`clock`]: injectable time source

pub mod clock;
pub mod config;
pub mod credentials;
pub mod handler;
pub mod logging;
pub mod signer;
pub mod store;
pub mod token;

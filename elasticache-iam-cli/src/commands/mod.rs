//! CLI subcommands.

pub mod common;
pub mod invoke;
pub mod token;

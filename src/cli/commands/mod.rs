//! CLI command handlers for `gpaplanner`.
//!
//! Each subcommand is implemented in its own submodule.

pub mod config;
pub mod solve;
pub mod trajectory;
pub mod transcript;

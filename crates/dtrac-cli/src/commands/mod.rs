//! Subcommand implementations.

pub mod analyze;
pub mod init;
pub mod layers;
pub mod list_collectors;
pub mod output;

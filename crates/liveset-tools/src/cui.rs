//! Subcommand implementations.
pub mod convert;
pub mod diff;
pub mod info;
pub mod migrate;

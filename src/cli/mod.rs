//! CLI module
//!
//! Command-line interface for driving pipeline runs.
//!
//! # Commands
//!
//! - `run` - Extract a height range into the configured store
//! - `check` - Verify upstream and store connectivity before a run

mod commands;
mod runner;

pub use commands::{Cli, Commands, StoreKind};
pub use runner::Runner;

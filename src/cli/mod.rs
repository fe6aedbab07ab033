//! Command-line interface for autotagger.
//!
//! Parses flags, merges them over the configuration file and dispatches to
//! the command implementations.

mod commands;

pub use commands::{Cli, Commands, StrictArgs, TagArgs, run_command};

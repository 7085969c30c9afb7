//! Command-line interface for llmkube.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, VersionArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};

//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::updates::{is_ci, UpdateSettings, LATEST_RELEASE_URL};

/// llmkube - Deploy and serve LLMs on Kubernetes.
#[derive(Debug, Parser)]
#[command(name = "llmkube")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip the check for a newer llmkube release
    #[arg(
        long,
        global = true,
        env = "LLMKUBE_NO_UPDATE_CHECK",
        value_parser = FalseyValueParser::new()
    )]
    pub no_update_check: bool,

    /// Release metadata endpoint used by update checks
    #[arg(
        long,
        global = true,
        hide = true,
        env = "LLMKUBE_UPDATE_URL",
        default_value = LATEST_RELEASE_URL
    )]
    pub update_url: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings for the update check that runs before the command.
    ///
    /// The check is off when disabled by flag or environment, in CI, with no
    /// subcommand, for `completions` (its stdout is sourced by shells), and
    /// for `version --check`, which does its own fresh check.
    pub fn update_settings(&self) -> UpdateSettings {
        let command_wants_check = match &self.command {
            None | Some(Commands::Completions(_)) => false,
            Some(Commands::Version(args)) => !args.check,
        };

        UpdateSettings {
            enabled: command_wants_check && !self.no_update_check && !is_ci(),
            url: self.update_url.clone(),
            cache_path: None,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `version` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VersionArgs {
    /// Query the latest release now, ignoring the cached result
    #[arg(long)]
    pub check: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

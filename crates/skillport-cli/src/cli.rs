//! CLI argument definitions for skillport.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skillport_core::Platform;

/// skillport -- convert between Claude Code skills and Gemini CLI extensions.
#[derive(Parser)]
#[command(
    name = "skillport",
    version,
    about = "Convert between Claude Code skills and Gemini CLI extensions",
    long_about = "Detects, converts, and validates skill directories so that one directory \
                  can serve both Claude Code (SKILL.md) and Gemini CLI (gemini-extension.json)."
)]
pub struct Cli {
    /// Log at debug level, ignoring RUST_LOG.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a skill or extension to the other platform.
    Convert {
        /// Directory containing the source skill or extension.
        path: PathBuf,

        /// Target platform: claude, gemini, or universal. Defaults to the
        /// side the directory is missing.
        #[arg(long)]
        to: Option<Platform>,

        /// Write converted files here instead of next to the source.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip validating the converted output.
        #[arg(long)]
        no_validate: bool,
    },

    /// Detect which platform a directory targets and show its metadata.
    Analyze {
        path: PathBuf,

        /// Print the detection result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a directory against platform rules.
    Validate {
        path: PathBuf,

        /// Platform to validate against. Defaults to the detected platform.
        #[arg(long)]
        platform: Option<Platform>,

        /// Print the validation result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Make a directory work with both Claude Code and Gemini CLI.
    Universal {
        path: PathBuf,

        /// Write generated files here instead of next to the source.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Convert in place, commit on a new branch, and open a GitHub pull request.
    CreatePr {
        /// Directory inside a git checkout.
        path: PathBuf,

        /// Platform to add. Defaults to the side the directory is missing.
        #[arg(long)]
        to: Option<Platform>,

        /// Branch the pull request targets.
        #[arg(long, default_value = "main")]
        base: String,

        /// Remote to push the new branch to.
        #[arg(long, default_value = "origin")]
        remote: String,

        /// Open the pull request as a draft.
        #[arg(long)]
        draft: bool,
    },

    /// Copy a skill to a new location, make it universal, and install links
    /// for both tools.
    Fork {
        path: PathBuf,

        /// Directory the copy is created in.
        #[arg(long, short)]
        location: PathBuf,
    },
}

impl Commands {
    /// Default log level: `warn` for read-only commands, `info` for commands
    /// that write.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Analyze { .. } | Self::Validate { .. } => "warn",
            _ => "info",
        }
    }
}

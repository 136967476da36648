//! Shell-backed workflows for skillport.
//!
//! The core crate never runs external programs. The workflows here do, and
//! only through the [`CommandRunner`] trait, so tests drive them with a fake
//! runner instead of real `git` and `gh`.

pub mod error;
pub mod fork;
pub mod pull_request;
pub mod runner;

pub use error::{AdapterError, Result};
pub use fork::{ForkOutcome, InstallDirs, fork};
pub use pull_request::{PullRequest, PullRequestOptions, create_pull_request};
pub use runner::{CommandOutput, CommandRunner, ShellRunner};

//! CLI entry point for skillport.
//!
//! This binary provides the `skillport` command with subcommands for
//! analyzing, converting, and validating skills and extensions, plus the
//! pull request and fork workflows.

mod cli;
mod helpers;
mod output;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use skillport_adapters::{InstallDirs, PullRequestOptions, ShellRunner};
use skillport_core::{Platform, detect};

use crate::cli::{Cli, Commands};
use crate::helpers::init_tracing;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.command.default_log_level(), cli.verbose);

    let ok = match cli.command {
        Commands::Convert {
            path,
            to,
            output,
            no_validate,
        } => cmd_convert(&path, to, output.as_deref(), !no_validate)?,
        Commands::Analyze { path, json } => cmd_analyze(&path, json)?,
        Commands::Validate {
            path,
            platform,
            json,
        } => cmd_validate(&path, platform, json)?,
        Commands::Universal { path, output } => cmd_universal(&path, output.as_deref())?,
        Commands::CreatePr {
            path,
            to,
            base,
            remote,
            draft,
        } => {
            let options = PullRequestOptions {
                target: to,
                base,
                remote,
                draft,
            };
            cmd_create_pr(&path, &options).await?
        }
        Commands::Fork { path, location } => cmd_fork(&path, &location).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ---------------------------------------------------------------------------
// Subcommand: convert
// ---------------------------------------------------------------------------

fn cmd_convert(
    path: &Path,
    target: Option<Platform>,
    output_dir: Option<&Path>,
    validate: bool,
) -> Result<bool> {
    let result = skillport_core::convert(path, target, output_dir);
    print!("{}", output::conversion(&result));
    if !result.success {
        return Ok(false);
    }

    if !validate {
        debug!("post-conversion validation skipped");
        return Ok(true);
    }

    let written_to = output_dir.unwrap_or(path);
    let platform = result.metadata.target.unwrap_or(Platform::Universal);
    let report = skillport_core::validate(written_to, platform);
    print!("{}", output::validation(written_to, platform, &report));
    Ok(report.valid)
}

// ---------------------------------------------------------------------------
// Subcommand: analyze
// ---------------------------------------------------------------------------

fn cmd_analyze(path: &Path, json: bool) -> Result<bool> {
    let result =
        detect(path).with_context(|| format!("failed to analyze {}", path.display()))?;

    if json {
        print!("{}", output::json(&result)?);
    } else {
        print!("{}", output::detection(path, &result));
    }
    Ok(result.platform != Platform::Unknown)
}

// ---------------------------------------------------------------------------
// Subcommand: validate
// ---------------------------------------------------------------------------

fn cmd_validate(path: &Path, platform: Option<Platform>, json: bool) -> Result<bool> {
    let platform = match platform {
        Some(platform) => platform,
        None => {
            detect(path)
                .with_context(|| format!("failed to detect platform of {}", path.display()))?
                .platform
        }
    };
    let report = skillport_core::validate(path, platform);

    if json {
        print!("{}", output::json(&report)?);
    } else {
        print!("{}", output::validation(path, platform, &report));
    }
    Ok(report.valid)
}

// ---------------------------------------------------------------------------
// Subcommand: universal
// ---------------------------------------------------------------------------

fn cmd_universal(path: &Path, output_dir: Option<&Path>) -> Result<bool> {
    let result = skillport_core::make_universal(path, output_dir);
    print!("{}", output::conversion(&result));
    Ok(result.success)
}

// ---------------------------------------------------------------------------
// Subcommand: create-pr
// ---------------------------------------------------------------------------

async fn cmd_create_pr(path: &Path, options: &PullRequestOptions) -> Result<bool> {
    let runner = ShellRunner::from_env();
    info!(
        dir = %path.display(),
        timeout_secs = runner.timeout_secs(),
        "creating pull request"
    );

    let pr = skillport_adapters::create_pull_request(&runner, path, options)
        .await
        .context("failed to create pull request")?;
    print!("{}", output::pull_request(&pr));
    Ok(true)
}

// ---------------------------------------------------------------------------
// Subcommand: fork
// ---------------------------------------------------------------------------

async fn cmd_fork(path: &Path, location: &Path) -> Result<bool> {
    let dirs = InstallDirs::from_env().context("failed to resolve install directories")?;
    let outcome = skillport_adapters::fork(path, location, &dirs)
        .await
        .with_context(|| format!("failed to fork {}", path.display()))?;
    print!("{}", output::fork(&outcome));
    Ok(true)
}

//! Pull request workflow: convert a checked-out repository in place, commit
//! the generated files on a fresh branch, and open a GitHub pull request.
//!
//! Every external step goes through a [`CommandRunner`]. The first failing
//! step aborts the workflow with the runner's message; nothing is retried or
//! rolled back.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use skillport_core::{ConversionResult, Platform, convert};

use crate::error::{AdapterError, Result};
use crate::runner::CommandRunner;

/// Options for [`create_pull_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOptions {
    /// Platform to add. `None` adds whichever side is missing.
    pub target: Option<Platform>,
    /// Branch the pull request merges into.
    pub base: String,
    /// Remote the new branch is pushed to.
    pub remote: String,
    pub draft: bool,
}

impl Default for PullRequestOptions {
    fn default() -> Self {
        Self {
            target: None,
            base: "main".to_owned(),
            remote: "origin".to_owned(),
            draft: false,
        }
    }
}

/// A pull request that was opened.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    pub url: String,
    pub branch: String,
    pub target: Platform,
    pub conversion: ConversionResult,
}

/// Branch name for adding `target` support.
pub fn branch_name(target: Platform) -> String {
    format!("skillport/add-{target}-support")
}

/// Pull request and commit title for adding `target` support.
pub fn title(target: Platform) -> String {
    format!("Add {} support", target.display_name())
}

/// Run the whole workflow for the repository containing `dir`.
pub async fn create_pull_request(
    runner: &dyn CommandRunner,
    dir: &Path,
    options: &PullRequestOptions,
) -> Result<PullRequest> {
    runner
        .run_checked("gh", &["auth", "status"], dir)
        .await
        .map_err(|e| {
            AdapterError::Precondition(format!(
                "GitHub CLI is not authenticated (run `gh auth login`): {e}"
            ))
        })?;
    runner
        .run_checked("git", &["rev-parse", "--is-inside-work-tree"], dir)
        .await
        .map_err(|e| {
            AdapterError::Precondition(format!("{} is not inside a git work tree: {e}", dir.display()))
        })?;

    let conversion = convert(dir, options.target, None);
    if !conversion.success {
        return Err(AdapterError::ConversionFailed(conversion.errors.join("; ")));
    }
    let target = conversion
        .metadata
        .target
        .or(options.target)
        .unwrap_or(Platform::Universal);

    let branch = branch_name(target);
    let title = title(target);

    runner
        .run_checked("git", &["checkout", "-b", branch.as_str()], dir)
        .await?;

    let files = relative_files(dir, &conversion.files);
    let mut add_args = vec!["add", "--"];
    add_args.extend(files.iter().map(String::as_str));
    runner.run_checked("git", &add_args, dir).await?;
    runner
        .run_checked("git", &["commit", "-m", title.as_str()], dir)
        .await?;

    runner
        .run_checked("git", &["push", "-u", options.remote.as_str(), branch.as_str()], dir)
        .await?;

    let body = pull_request_body(target, &files, &conversion.warnings);
    let mut pr_args = vec![
        "pr",
        "create",
        "--base",
        options.base.as_str(),
        "--head",
        branch.as_str(),
        "--title",
        title.as_str(),
        "--body",
        body.as_str(),
    ];
    if options.draft {
        pr_args.push("--draft");
    }
    let output = runner.run_checked("gh", &pr_args, dir).await?;
    let url = output.stdout.trim().to_owned();

    info!(url = %url, branch = %branch, target = %target, "pull request created");
    Ok(PullRequest {
        url,
        branch,
        target,
        conversion,
    })
}

/// Written files as paths relative to `dir`, for `git add` and the PR body.
fn relative_files(dir: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            file.strip_prefix(dir)
                .unwrap_or(file)
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

fn pull_request_body(target: Platform, files: &[String], warnings: &[String]) -> String {
    let mut body = format!(
        "## Summary\n\nAdds {} support, generated by skillport.\n\n## Generated files\n\n",
        target.display_name()
    );
    for file in files {
        body.push_str(&format!("- `{file}`\n"));
    }

    if !warnings.is_empty() {
        body.push_str("\n## Conversion warnings\n\n");
        for warning in warnings {
            body.push_str(&format!("- {warning}\n"));
        }
    }

    body.push_str(
        "\n## Testing\n\n\
         - [ ] Claude Code: install the skill and confirm it is listed and loads\n\
         - [ ] Gemini CLI: `gemini extensions install` this directory and confirm the \
         context file is loaded\n",
    );
    body
}

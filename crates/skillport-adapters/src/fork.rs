//! Fork workflow: copy a skill or extension to a new location, make the copy
//! dual-platform, and link it into both tools' install directories.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use skillport_core::{ConversionResult, PortError, make_universal};

use crate::error::{AdapterError, Result};

/// Directory names never copied into a fork.
pub const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Environment variable overriding the Claude skills directory.
pub const CLAUDE_SKILLS_ENV: &str = "SKILLPORT_CLAUDE_SKILLS_DIR";

/// Environment variable overriding the Gemini extensions directory.
pub const GEMINI_EXTENSIONS_ENV: &str = "SKILLPORT_GEMINI_EXTENSIONS_DIR";

/// Where each tool looks for installed skills and extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirs {
    pub claude_skills: PathBuf,
    pub gemini_extensions: PathBuf,
}

impl InstallDirs {
    pub fn new(claude_skills: impl Into<PathBuf>, gemini_extensions: impl Into<PathBuf>) -> Self {
        Self {
            claude_skills: claude_skills.into(),
            gemini_extensions: gemini_extensions.into(),
        }
    }

    /// Resolve from the override variables, falling back to
    /// `~/.claude/skills` and `~/.gemini/extensions`.
    pub fn from_env() -> Result<Self> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let resolve = |env: &str, default: &[&str]| -> Result<PathBuf> {
            if let Some(dir) = std::env::var_os(env) {
                return Ok(PathBuf::from(dir));
            }
            let home = home.as_ref().ok_or_else(|| {
                AdapterError::Precondition(format!("HOME is not set; set {env} instead"))
            })?;
            Ok(default.iter().fold(home.clone(), |path, part| path.join(part)))
        };

        Ok(Self {
            claude_skills: resolve(CLAUDE_SKILLS_ENV, &[".claude", "skills"])?,
            gemini_extensions: resolve(GEMINI_EXTENSIONS_ENV, &[".gemini", "extensions"])?,
        })
    }
}

/// Result of a completed fork.
#[derive(Debug, Clone, Serialize)]
pub struct ForkOutcome {
    /// The new copy.
    pub path: PathBuf,
    /// Install links created by this run.
    pub links: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub conversion: ConversionResult,
}

/// Fork `source` into `location/<name>`.
pub async fn fork(source: &Path, location: &Path, dirs: &InstallDirs) -> Result<ForkOutcome> {
    if !source.is_dir() {
        return Err(PortError::NotFound(source.to_path_buf()).into());
    }
    let source = tokio::fs::canonicalize(source).await?;
    let name = source
        .file_name()
        .ok_or_else(|| AdapterError::Precondition("cannot fork a filesystem root".into()))?
        .to_owned();

    tokio::fs::create_dir_all(location).await?;
    let location = tokio::fs::canonicalize(location).await?;
    let target = location.join(&name);
    if tokio::fs::symlink_metadata(&target).await.is_ok() {
        return Err(AdapterError::Precondition(format!(
            "{} already exists",
            target.display()
        )));
    }
    if target.starts_with(&source) {
        return Err(AdapterError::Precondition(format!(
            "cannot fork {} into itself",
            source.display()
        )));
    }

    let copied = copy_tree(&source, &target).await?;
    debug!(from = %source.display(), to = %target.display(), files = copied, "copied source tree");

    let conversion = {
        let target = target.clone();
        tokio::task::spawn_blocking(move || make_universal(&target, None))
            .await
            .map_err(|e| AdapterError::ConversionFailed(format!("conversion task panicked: {e}")))?
    };
    if !conversion.success {
        return Err(AdapterError::ConversionFailed(conversion.errors.join("; ")));
    }

    let mut warnings = conversion.warnings.clone();
    let mut links = Vec::new();
    for install_dir in [&dirs.claude_skills, &dirs.gemini_extensions] {
        let link = install_dir.join(&name);
        match install_link(&target, &link).await? {
            Some(warning) => warnings.push(warning),
            None => links.push(link),
        }
    }

    info!(path = %target.display(), links = links.len(), "fork complete");
    Ok(ForkOutcome {
        path: target,
        links,
        warnings,
        conversion,
    })
}

/// Copy regular files under `from` into `to`, skipping [`SKIPPED_DIRS`] and
/// anything that is neither a file nor a directory. Returns the number of
/// files copied.
async fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];
    let mut copied = 0;

    while let Some((src, dst)) = pending.pop() {
        tokio::fs::create_dir_all(&dst).await?;
        let mut entries = tokio::fs::read_dir(&src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let file_name = entry.file_name();
            let dst_path = dst.join(&file_name);

            if file_type.is_dir() {
                let skipped = file_name
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name));
                if skipped {
                    debug!(path = %entry.path().display(), "skipping directory");
                } else {
                    pending.push((entry.path(), dst_path));
                }
            } else if file_type.is_file() {
                tokio::fs::copy(entry.path(), &dst_path).await?;
                copied += 1;
            } else {
                debug!(path = %entry.path().display(), "skipping non-regular file");
            }
        }
    }
    Ok(copied)
}

/// Link `link` to `target`. Returns a warning instead of failing when the
/// link cannot or should not be created.
async fn install_link(target: &Path, link: &Path) -> Result<Option<String>> {
    if tokio::fs::symlink_metadata(link).await.is_ok() {
        warn!(link = %link.display(), "install link already exists");
        return Ok(Some(format!(
            "{} already exists; left untouched",
            link.display()
        )));
    }

    create_link(target, link).await
}

#[cfg(unix)]
async fn create_link(target: &Path, link: &Path) -> Result<Option<String>> {
    if let Some(parent) = link.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::symlink(target, link).await?;
    debug!(link = %link.display(), target = %target.display(), "created install link");
    Ok(None)
}

#[cfg(not(unix))]
async fn create_link(target: &Path, link: &Path) -> Result<Option<String>> {
    Ok(Some(format!(
        "install links are only created on unix; link {} to {} manually",
        link.display(),
        target.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_tree_skips_build_and_vcs_dirs() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join(".git/objects")).unwrap();
        std::fs::create_dir_all(src.path().join("node_modules/pkg")).unwrap();
        std::fs::create_dir_all(src.path().join("mcp-server/lib")).unwrap();
        std::fs::write(src.path().join(".git/HEAD"), "ref").unwrap();
        std::fs::write(src.path().join("node_modules/pkg/index.js"), "x").unwrap();
        std::fs::write(src.path().join("mcp-server/lib/index.js"), "y").unwrap();
        std::fs::write(src.path().join("SKILL.md"), "z").unwrap();

        let out = tempfile::tempdir().unwrap();
        let dst = out.path().join("copy");
        let copied = copy_tree(src.path(), &dst).await.unwrap();

        assert_eq!(copied, 2);
        assert!(dst.join("mcp-server/lib/index.js").is_file());
        assert!(dst.join("SKILL.md").is_file());
        assert!(!dst.join(".git").exists());
        assert!(!dst.join("node_modules").exists());
    }

    #[test]
    fn install_dirs_new() {
        let dirs = InstallDirs::new("/a", "/b");
        assert_eq!(dirs.claude_skills, PathBuf::from("/a"));
        assert_eq!(dirs.gemini_extensions, PathBuf::from("/b"));
    }
}

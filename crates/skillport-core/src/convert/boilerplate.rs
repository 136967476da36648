//! Generated prose: the Gemini banner, the Claude configuration section,
//! conversion footers, and the shared documentation placeholders.
//!
//! Every generated block is fenced by HTML comment markers so the opposite
//! converter can strip it again. Stripping removes every generated block
//! regardless of direction, which keeps repeated round trips from
//! accumulating banners or footers.

use std::path::{Path, PathBuf};

use crate::catalog::{SHARED_DOC_FILES, SHARED_DOCS_DIR};
use crate::error::Result;
use crate::types::SettingDescriptor;

const BLOCK_KINDS: &[&str] = &["banner", "configuration", "footer"];

fn open_marker(kind: &str) -> String {
    format!("<!-- skillport:{kind} -->")
}

fn close_marker(kind: &str) -> String {
    format!("<!-- /skillport:{kind} -->")
}

fn fenced(kind: &str, inner: &str) -> String {
    format!(
        "{}\n{}\n{}\n",
        open_marker(kind),
        inner.trim_matches('\n'),
        close_marker(kind)
    )
}

/// Banner and quick-start paragraph prepended to a Gemini context file.
pub fn gemini_banner(name: &str, description: &str) -> String {
    let inner = format!(
        "# {name} - Gemini CLI Extension\n\
         \n\
         {description}\n\
         \n\
         ## Quick Start\n\
         \n\
         Install the extension from this directory, then ask Gemini for help with `{name}`:\n\
         \n\
         ```bash\n\
         gemini extensions install <path-to-{name}>\n\
         ```"
    );
    fenced("banner", &inner)
}

/// Provenance footer appended to a Gemini context file.
pub fn gemini_footer() -> String {
    fenced(
        "footer",
        "---\n\n*This extension was converted from a Claude Code skill by skillport.*",
    )
}

/// Provenance footer appended to a Claude skill body.
pub fn claude_footer() -> String {
    fenced(
        "footer",
        "---\n\n*This skill was converted from a Gemini CLI extension by skillport.*",
    )
}

/// Render the "Configuration" section listing every setting.
pub fn configuration_section(settings: &[SettingDescriptor]) -> String {
    let mut inner = String::from(
        "## Configuration\n\nThis skill reads the following environment variables:\n\n",
    );
    for setting in settings {
        inner.push_str(&format!("- **{}**: {}", setting.name, setting.description));
        if let Some(default) = &setting.default {
            inner.push_str(&format!(" (default: `{default}`)"));
        }
        if setting.is_required() {
            inner.push_str(" **(required)**");
        }
        inner.push('\n');
    }
    fenced("configuration", &inner)
}

/// Remove every generated block from `body` and trim surrounding blank lines.
pub fn strip_generated(body: &str) -> String {
    let mut text = body.to_owned();
    for kind in BLOCK_KINDS {
        let open = open_marker(kind);
        let close = close_marker(kind);
        while let Some(start) = text.find(&open) {
            let Some(close_at) = text[start..].find(&close) else {
                break;
            };
            let mut end = start + close_at + close.len();
            if text[end..].starts_with("\r\n") {
                end += 2;
            } else if text[end..].starts_with('\n') {
                end += 1;
            }
            text.replace_range(start..end, "");
        }
    }
    text.trim_matches(['\n', '\r']).to_owned()
}

/// Join non-empty sections with a blank line between them.
pub fn assemble(sections: &[&str]) -> String {
    let mut out = sections
        .iter()
        .map(|s| s.trim_matches('\n'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

/// Create `shared/` with placeholder documents when it does not exist.
///
/// An existing directory is never touched. Returns the files created.
pub fn ensure_shared_docs(root: &Path) -> Result<Vec<PathBuf>> {
    let shared = root.join(SHARED_DOCS_DIR);
    if shared.exists() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(&shared)?;
    let mut created = Vec::with_capacity(SHARED_DOC_FILES.len());
    for (file, content) in SHARED_DOC_FILES {
        let path = shared.join(file);
        std::fs::write(&path, content)?;
        created.push(path);
    }
    tracing::debug!(dir = %shared.display(), "created shared docs");
    Ok(created)
}

//! Source document loading.
//!
//! Reads one side of a directory into memory before conversion. Anything a
//! conversion cannot proceed without (the entry document, a parseable
//! manifest, the required metadata fields) fails here, before any file is
//! written.

use std::path::{Path, PathBuf};

use crate::catalog::{GEMINI_MANIFEST_FILE, MARKETPLACE_FILE, MCP_CONFIG_FILE, SKILL_FILE};
use crate::error::{PortError, Result};
use crate::frontmatter::{self, Frontmatter};
use crate::manifest::{GeminiManifest, Marketplace, read_json};
use crate::types::ServerMap;

/// A Claude skill read from disk.
#[derive(Debug, Clone)]
pub struct ClaudeSkill {
    pub frontmatter: Frontmatter,
    /// Markdown after the metadata block.
    pub body: String,
    pub marketplace: Option<Marketplace>,
    /// Servers from a project-level `.mcp.json`, used when the marketplace
    /// declares none.
    pub project_servers: Option<ServerMap>,
}

impl ClaudeSkill {
    /// `name` with surrounding quotes removed.
    pub fn name(&self) -> &str {
        self.frontmatter.scalar("name").map(frontmatter::unquote).unwrap_or_default()
    }

    /// `description` with surrounding quotes removed.
    pub fn description(&self) -> &str {
        self.frontmatter
            .scalar("description")
            .map(frontmatter::unquote)
            .unwrap_or_default()
    }

    /// Server configurations: the marketplace's first plugin, else `.mcp.json`.
    pub fn servers(&self) -> Option<&ServerMap> {
        self.marketplace
            .as_ref()
            .and_then(Marketplace::first_plugin_servers)
            .or(self.project_servers.as_ref())
    }
}

/// A Gemini extension read from disk.
#[derive(Debug, Clone)]
pub struct GeminiExtension {
    pub manifest: GeminiManifest,
    /// Context document contents, when the file exists.
    pub context: Option<String>,
    pub context_path: PathBuf,
}

/// Shape of `.mcp.json`.
#[derive(Debug, serde::Deserialize)]
struct ProjectMcpConfig {
    #[serde(default, rename = "mcpServers")]
    mcp_servers: ServerMap,
}

/// Load the Claude side of `dir`.
pub fn load_claude_skill(dir: &Path) -> Result<ClaudeSkill> {
    let skill_path = dir.join(SKILL_FILE);
    if !skill_path.is_file() {
        return Err(PortError::missing(dir, SKILL_FILE));
    }

    let content = std::fs::read_to_string(&skill_path)?;
    let (block, body) = frontmatter::split(&content)
        .ok_or_else(|| PortError::malformed(&skill_path, "missing frontmatter block (---)"))?;
    let fields = frontmatter::parse_block(block);

    for field in ["name", "description"] {
        if fields.scalar(field).is_none_or(|v| frontmatter::unquote(v).is_empty()) {
            return Err(PortError::malformed(
                &skill_path,
                format!("missing required field `{field}`"),
            ));
        }
    }

    let marketplace_path = dir.join(MARKETPLACE_FILE);
    let marketplace = if marketplace_path.is_file() {
        Some(read_json::<Marketplace>(&marketplace_path)?)
    } else {
        None
    };

    let mcp_path = dir.join(MCP_CONFIG_FILE);
    let project_servers = if mcp_path.is_file() {
        let config = read_json::<ProjectMcpConfig>(&mcp_path)?;
        Some(config.mcp_servers).filter(|servers| !servers.is_empty())
    } else {
        None
    };

    let skill = ClaudeSkill {
        body: body.to_owned(),
        frontmatter: fields,
        marketplace,
        project_servers,
    };
    tracing::debug!(
        name = skill.name(),
        marketplace = skill.marketplace.is_some(),
        "loaded claude skill"
    );
    Ok(skill)
}

/// Load the Gemini side of `dir`.
pub fn load_gemini_extension(dir: &Path) -> Result<GeminiExtension> {
    let manifest_path = dir.join(GEMINI_MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(PortError::missing(dir, GEMINI_MANIFEST_FILE));
    }

    let manifest: GeminiManifest = read_json(&manifest_path)?;
    if manifest.name.trim().is_empty() {
        return Err(PortError::malformed(&manifest_path, "`name` must not be empty"));
    }

    let context_path = dir.join(manifest.context_file());
    let context = if context_path.is_file() {
        Some(std::fs::read_to_string(&context_path)?)
    } else {
        tracing::debug!(path = %context_path.display(), "no context file");
        None
    };

    tracing::debug!(name = %manifest.name, context = context.is_some(), "loaded gemini extension");
    Ok(GeminiExtension {
        manifest,
        context,
        context_path,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_skill_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_claude_skill(tmp.path()).unwrap_err();
        assert!(matches!(err, PortError::MissingRequiredFile { .. }));
    }

    #[test]
    fn missing_required_field() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("SKILL.md"), "---\nname: x\n---\nbody").unwrap();
        let err = load_claude_skill(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn loads_skill_with_marketplace() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("SKILL.md"),
            "---\nname: \"demo\"\ndescription: Demo skill\n---\n# Demo\n",
        )
        .unwrap();
        std::fs::create_dir(tmp.path().join(".claude-plugin")).unwrap();
        std::fs::write(
            tmp.path().join(".claude-plugin/marketplace.json"),
            r#"{"name": "demo", "plugins": [{"name": "demo", "description": "d",
                "mcpServers": {"s": {"command": "node"}}}]}"#,
        )
        .unwrap();

        let skill = load_claude_skill(tmp.path()).unwrap();
        assert_eq!(skill.name(), "demo");
        assert_eq!(skill.body, "# Demo\n");
        assert_eq!(skill.servers().map(ServerMap::len), Some(1));
    }

    #[test]
    fn falls_back_to_project_mcp_config() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("SKILL.md"),
            "---\nname: demo\ndescription: Demo skill\n---\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join(".mcp.json"),
            r#"{"mcpServers": {"db": {"command": "node", "env": {"TOKEN": "${TOKEN}"}}}}"#,
        )
        .unwrap();
        let skill = load_claude_skill(tmp.path()).unwrap();
        assert!(skill.servers().and_then(|s| s.get("db")).is_some());
    }

    #[test]
    fn malformed_marketplace_aborts() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("SKILL.md"),
            "---\nname: demo\ndescription: Demo skill\n---\n",
        )
        .unwrap();
        std::fs::create_dir(tmp.path().join(".claude-plugin")).unwrap();
        std::fs::write(tmp.path().join(".claude-plugin/marketplace.json"), "[oops").unwrap();
        let err = load_claude_skill(tmp.path()).unwrap_err();
        assert!(matches!(err, PortError::MalformedDocument { .. }));
    }

    #[test]
    fn loads_extension_without_context() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("gemini-extension.json"),
            r#"{"name": "ext", "version": "1.0.0"}"#,
        )
        .unwrap();
        let ext = load_gemini_extension(tmp.path()).unwrap();
        assert!(ext.context.is_none());
        assert!(ext.context_path.ends_with("GEMINI.md"));
    }
}

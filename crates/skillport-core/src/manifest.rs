//! Typed on-disk manifests: the Gemini extension manifest and the Claude
//! plugin marketplace manifest.
//!
//! Both are read leniently (unknown keys survive a read/write cycle through
//! `extra`) but the Gemini manifest's `name` and `version` are required.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PortError, Result};
use crate::types::{ServerMap, SettingDescriptor};

/// `gemini-extension.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiManifest {
    pub name: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tools: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_servers: Option<ServerMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<SettingDescriptor>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GeminiManifest {
    /// Name of the context document, falling back to `GEMINI.md`.
    pub fn context_file(&self) -> &str {
        self.context_file_name
            .as_deref()
            .unwrap_or(crate::catalog::DEFAULT_CONTEXT_FILE)
    }
}

/// `.claude-plugin/marketplace.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marketplace {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub owner: Person,

    #[serde(default)]
    pub metadata: MarketplaceMetadata,

    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Marketplace {
    /// Server configurations of the first plugin entry, if any.
    pub fn first_plugin_servers(&self) -> Option<&ServerMap> {
        self.plugins.first().and_then(|p| p.mcp_servers.as_ref())
    }

    /// Version declared in `metadata.version`, falling back to the first plugin's.
    pub fn version(&self) -> Option<&str> {
        self.metadata
            .version
            .as_deref()
            .or_else(|| self.plugins.first().and_then(|p| p.version.as_deref()))
    }
}

/// Owner or author record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Package-level metadata of a marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One plugin listed by a marketplace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginEntry {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default)]
    pub strict: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Person>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_servers: Option<ServerMap>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_source() -> String {
    "./".to_owned()
}

// ---------------------------------------------------------------------------
// Read / write helpers
// ---------------------------------------------------------------------------

/// Read and deserialize a JSON document, mapping parse failures to
/// [`PortError::MalformedDocument`].
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| PortError::malformed(path, e.to_string()))
}

/// Serialize pretty-printed JSON with a trailing newline and write it out,
/// creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "wrote manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_manifest_requires_name_and_version() {
        let missing_version = r#"{"name": "ext"}"#;
        assert!(serde_json::from_str::<GeminiManifest>(missing_version).is_err());

        let ok = r#"{"name": "ext", "version": "0.2.0", "homepage": "https://example.com"}"#;
        let manifest: GeminiManifest = serde_json::from_str(ok).unwrap();
        assert_eq!(manifest.context_file(), "GEMINI.md");
        assert_eq!(
            manifest.extra.get("homepage").and_then(|v| v.as_str()),
            Some("https://example.com")
        );
    }

    #[test]
    fn gemini_manifest_field_order() {
        let manifest = GeminiManifest {
            name: "ext".into(),
            version: "1.0.0".into(),
            description: Some("An extension".into()),
            context_file_name: Some("GEMINI.md".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(
            json,
            r#"{"name":"ext","version":"1.0.0","description":"An extension","contextFileName":"GEMINI.md"}"#
        );
    }

    #[test]
    fn marketplace_reads_nested_servers() {
        let json = r#"{
            "name": "db-tools",
            "owner": {"name": "Ada"},
            "metadata": {"description": "Database helpers", "version": "2.1.0"},
            "plugins": [{
                "name": "db-helper",
                "description": "Query databases",
                "mcpServers": {
                    "db": {"command": "node", "args": ["mcp-server/index.js"]}
                }
            }]
        }"#;
        let marketplace: Marketplace = serde_json::from_str(json).unwrap();
        assert_eq!(marketplace.version(), Some("2.1.0"));
        let servers = marketplace.first_plugin_servers().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(marketplace.plugins[0].source, "./");
    }

    #[test]
    fn read_json_reports_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gemini-extension.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json::<GeminiManifest>(&path).unwrap_err();
        assert!(matches!(err, PortError::MalformedDocument { .. }));
    }
}

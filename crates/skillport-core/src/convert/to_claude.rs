//! Gemini extension -> Claude skill.

use std::path::{Path, PathBuf};

use crate::catalog::{ALLOWED_TOOLS_KEY, EXTENSION_PATH_TOKEN, MARKETPLACE_FILE, SKILL_FILE};
use crate::convert::Converter;
use crate::convert::boilerplate::{
    assemble, claude_footer, configuration_section, ensure_shared_docs, strip_generated,
};
use crate::error::Result;
use crate::frontmatter::{self, FieldValue};
use crate::loader::{GeminiExtension, load_gemini_extension};
use crate::manifest::{
    GeminiManifest, Marketplace, MarketplaceMetadata, Person, PluginEntry, write_json,
};
use crate::permissions::blacklist_to_whitelist;
use crate::types::{ConversionResult, Platform, ServerConfig};

/// Converts the Gemini side of `source_dir` into Claude files in `output_dir`.
#[derive(Debug, Clone)]
pub struct GeminiToClaude {
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl GeminiToClaude {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

impl Converter for GeminiToClaude {
    fn source(&self) -> Platform {
        Platform::Gemini
    }

    fn target(&self) -> Platform {
        Platform::Claude
    }

    fn run(&self, result: &mut ConversionResult) -> Result<()> {
        let extension = load_gemini_extension(&self.source_dir)?;
        let manifest = &extension.manifest;

        let description = match manifest.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_owned(),
            _ => {
                result
                    .warnings
                    .push("gemini-extension.json has no description; generated one".to_owned());
                format!("Converted from the {} Gemini CLI extension.", manifest.name)
            }
        };

        let scalars = [
            ("name", manifest.name.as_str()),
            ("description", description.as_str()),
        ];
        for (field, value) in scalars {
            if frontmatter::is_multiline(value) {
                result.warnings.push(format!(
                    "{field} spans several lines; joined onto one line in SKILL.md"
                ));
            }
        }

        let mut fields = vec![
            ("name", FieldValue::Scalar(manifest.name.clone())),
            ("description", FieldValue::Scalar(description.clone())),
        ];
        if let Some(excluded) = &manifest.exclude_tools {
            let mapping = blacklist_to_whitelist(excluded);
            result.warnings.extend(mapping.warnings());
            result.metadata.tools.clone_from(&mapping.tools);
            fields.push((ALLOWED_TOOLS_KEY, FieldValue::List(mapping.tools)));
        }

        let settings = manifest.settings.as_deref().unwrap_or_default();
        let configuration = if settings.is_empty() {
            String::new()
        } else {
            configuration_section(settings)
        };
        let body = skill_body(&extension, &description);

        std::fs::create_dir_all(&self.output_dir)?;

        let skill_path = self.output_dir.join(SKILL_FILE);
        let document = format!(
            "{}\n{}",
            frontmatter::render(&fields),
            assemble(&[&configuration, &body, &claude_footer()])
        );
        std::fs::write(&skill_path, document)?;
        result.files.push(skill_path);

        let marketplace = build_marketplace(&extension, &description);
        let marketplace_path = self.output_dir.join(MARKETPLACE_FILE);
        write_json(&marketplace_path, &marketplace)?;
        result.files.push(marketplace_path);

        result.files.extend(ensure_shared_docs(&self.output_dir)?);

        result.metadata.name = Some(manifest.name.clone());
        result.metadata.version = Some(manifest.version.clone());
        result.metadata.server_count = manifest.mcp_servers.as_ref().map_or(0, |s| s.len());
        result.metadata.settings_count = settings.len();
        Ok(())
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

/// The context document with generated blocks removed, or a stub heading
/// when the extension ships no context file.
fn skill_body(extension: &GeminiExtension, description: &str) -> String {
    match &extension.context {
        Some(context) => strip_generated(context),
        None => format!("# {}\n\n{description}", extension.manifest.name),
    }
}

fn build_marketplace(extension: &GeminiExtension, description: &str) -> Marketplace {
    let manifest = &extension.manifest;
    let author = manifest
        .extra
        .get("author")
        .and_then(|v| v.as_str())
        .map(str::to_owned);
    let owner = Person {
        name: author.clone().unwrap_or_else(|| manifest.name.clone()),
        email: None,
    };

    let plugin = PluginEntry {
        name: manifest.name.clone(),
        description: description.to_owned(),
        source: "./".to_owned(),
        strict: false,
        version: Some(manifest.version.clone()),
        author: author.map(|name| Person { name, email: None }),
        repository: string_extra(manifest, "repository"),
        license: string_extra(manifest, "license"),
        skills: vec!["./".to_owned()],
        mcp_servers: manifest
            .mcp_servers
            .as_ref()
            .map(|servers| servers.map_values(strip_server_paths)),
        ..Default::default()
    };

    Marketplace {
        name: manifest.name.clone(),
        owner,
        metadata: MarketplaceMetadata {
            description: Some(description.to_owned()),
            version: Some(manifest.version.clone()),
        },
        plugins: vec![plugin],
        extra: serde_json::Map::new(),
    }
}

fn string_extra(manifest: &GeminiManifest, key: &str) -> Option<String> {
    manifest
        .extra
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
}

/// Remove the extension path placeholder from arguments.
pub fn strip_server_paths(server: &ServerConfig) -> ServerConfig {
    let args = server
        .args
        .iter()
        .map(|arg| match arg.strip_prefix(EXTENSION_PATH_TOKEN) {
            Some("") => ".".to_owned(),
            Some(rest) => rest.trim_start_matches(['/', '\\']).to_owned(),
            None => arg.clone(),
        })
        .collect();

    ServerConfig {
        args,
        ..server.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_placeholder_prefix() {
        let server = ServerConfig {
            command: Some("node".into()),
            args: vec![
                "${extensionPath}/mcp-server/index.js".into(),
                "${extensionPath}".into(),
                "--flag".into(),
            ],
            env: [("TOKEN", "${TOKEN}".to_owned())].into_iter().collect(),
            ..Default::default()
        };
        let stripped = strip_server_paths(&server);
        assert_eq!(stripped.args, vec!["mcp-server/index.js", ".", "--flag"]);
        assert_eq!(stripped.env.get("TOKEN").map(String::as_str), Some("${TOKEN}"));
    }

    #[test]
    fn missing_manifest_fails() {
        let src = tempfile::tempdir().unwrap();
        let result = GeminiToClaude::new(src.path(), src.path()).convert();
        assert!(!result.success);
        assert!(result.errors[0].contains("gemini-extension.json"));
    }

    #[test]
    fn writes_skill_and_marketplace() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("gemini-extension.json"),
            r#"{
                "name": "weather",
                "version": "0.3.0",
                "description": "Forecasts from the weather service.",
                "author": "Ada",
                "excludeTools": ["Bash", "KillShell"],
                "settings": [
                    {"name": "API_KEY", "description": "API key", "secret": true, "required": true}
                ]
            }"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join("GEMINI.md"), "# Weather\n\nAsk about weather.\n").unwrap();

        let result = GeminiToClaude::new(tmp.path(), tmp.path()).convert();
        assert!(result.success, "{:?}", result.errors);

        let skill = std::fs::read_to_string(tmp.path().join("SKILL.md")).unwrap();
        let fm = frontmatter::extract(&skill);
        assert_eq!(fm.scalar("name"), Some("weather"));
        let allowed = frontmatter::list_field(&fm, "allowed-tools").unwrap();
        assert_eq!(allowed.len(), 14);
        assert!(!allowed.iter().any(|t| t == "Bash"));

        let body = frontmatter::body(&skill);
        let config_at = body.find("## Configuration").unwrap();
        let original_at = body.find("# Weather").unwrap();
        assert!(config_at < original_at);
        assert!(body.contains("- **API_KEY**: API key **(required)**"));

        let marketplace: Marketplace = crate::manifest::read_json(
            &tmp.path().join(".claude-plugin/marketplace.json"),
        )
        .unwrap();
        assert_eq!(marketplace.owner.name, "Ada");
        assert_eq!(marketplace.version(), Some("0.3.0"));
    }

    #[test]
    fn multiline_description_is_folded() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("gemini-extension.json"),
            r#"{
                "name": "weather",
                "version": "0.3.0",
                "description": "Forecasts for any city.\nAlso severe weather alerts: storms."
            }"#,
        )
        .unwrap();

        let result = GeminiToClaude::new(tmp.path(), tmp.path()).convert();
        assert!(result.success, "{:?}", result.errors);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.starts_with("description spans several lines"))
        );

        let skill = std::fs::read_to_string(tmp.path().join("SKILL.md")).unwrap();
        let fm = frontmatter::extract(&skill);
        assert_eq!(fm.len(), 2);
        assert_eq!(
            fm.scalar("description"),
            Some("Forecasts for any city. Also severe weather alerts: storms.")
        );
        assert!(fm.get("Also severe weather alerts").is_none());
    }
}

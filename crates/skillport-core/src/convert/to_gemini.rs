//! Claude skill -> Gemini extension.

use std::path::{Path, PathBuf};

use crate::catalog::{
    ALLOWED_TOOLS_KEY, DEFAULT_CONTEXT_FILE, DEFAULT_VERSION, EXTENSION_PATH_TOKEN,
    GEMINI_MANIFEST_FILE,
};
use crate::convert::Converter;
use crate::convert::boilerplate::{
    assemble, ensure_shared_docs, gemini_banner, gemini_footer, strip_generated,
};
use crate::error::Result;
use crate::frontmatter::{self, list_field};
use crate::loader::load_claude_skill;
use crate::manifest::{GeminiManifest, write_json};
use crate::permissions::whitelist_to_blacklist;
use crate::settings::infer_settings;
use crate::types::{ConversionResult, Platform, ServerConfig};

/// Converts the Claude side of `source_dir` into Gemini files in `output_dir`.
#[derive(Debug, Clone)]
pub struct ClaudeToGemini {
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl ClaudeToGemini {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

impl Converter for ClaudeToGemini {
    fn source(&self) -> Platform {
        Platform::Claude
    }

    fn target(&self) -> Platform {
        Platform::Gemini
    }

    fn run(&self, result: &mut ConversionResult) -> Result<()> {
        let skill = load_claude_skill(&self.source_dir)?;
        let name = skill.name().to_owned();
        let description = skill.description().to_owned();
        let version = skill
            .marketplace
            .as_ref()
            .and_then(|m| m.version())
            .or_else(|| skill.frontmatter.scalar("version").map(frontmatter::unquote))
            .unwrap_or(DEFAULT_VERSION)
            .to_owned();

        let mut manifest = GeminiManifest {
            name: name.clone(),
            version: version.clone(),
            description: Some(description.clone()),
            context_file_name: Some(DEFAULT_CONTEXT_FILE.to_owned()),
            ..Default::default()
        };

        if let Some(allowed) = list_field(&skill.frontmatter, ALLOWED_TOOLS_KEY) {
            let mapping = whitelist_to_blacklist(&allowed);
            result.warnings.extend(mapping.warnings());
            result.metadata.tools.clone_from(&mapping.tools);
            manifest.exclude_tools = Some(mapping.tools);
        }

        if let Some(servers) = skill.servers().filter(|s| !s.is_empty()) {
            let servers = servers.map_values(prefix_server_paths);
            let settings = infer_settings(&servers);
            result.metadata.server_count = servers.len();
            result.metadata.settings_count = settings.len();
            if !settings.is_empty() {
                manifest.settings = Some(settings);
            }
            manifest.mcp_servers = Some(servers);
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let manifest_path = self.output_dir.join(GEMINI_MANIFEST_FILE);
        write_json(&manifest_path, &manifest)?;
        result.files.push(manifest_path);

        let context_path = self.output_dir.join(DEFAULT_CONTEXT_FILE);
        let context = assemble(&[
            &gemini_banner(&name, &description),
            &strip_generated(&skill.body),
            &gemini_footer(),
        ]);
        std::fs::write(&context_path, context)?;
        result.files.push(context_path);

        result.files.extend(ensure_shared_docs(&self.output_dir)?);

        result.metadata.name = Some(name);
        result.metadata.version = Some(version);
        Ok(())
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

/// Prefix relative-looking arguments with the extension path placeholder.
///
/// An argument counts as a relative path when it starts with an ASCII letter.
/// Environment values pass through unchanged: `${VAR}` is shared syntax.
pub fn prefix_server_paths(server: &ServerConfig) -> ServerConfig {
    let args = server
        .args
        .iter()
        .map(|arg| {
            let looks_relative = arg.starts_with(|c: char| c.is_ascii_alphabetic());
            if looks_relative && !arg.starts_with(EXTENSION_PATH_TOKEN) {
                format!("{EXTENSION_PATH_TOKEN}/{arg}")
            } else {
                arg.clone()
            }
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
    fn prefixes_only_relative_arguments() {
        let server = ServerConfig {
            command: Some("node".into()),
            args: vec![
                "mcp-server/index.js".into(),
                "--verbose".into(),
                "/abs/path.js".into(),
                "${extensionPath}/already.js".into(),
                "./dot.js".into(),
            ],
            ..Default::default()
        };
        let rewritten = prefix_server_paths(&server);
        assert_eq!(
            rewritten.args,
            vec![
                "${extensionPath}/mcp-server/index.js",
                "--verbose",
                "/abs/path.js",
                "${extensionPath}/already.js",
                "./dot.js",
            ]
        );
        assert_eq!(rewritten.command, server.command);
    }

    #[test]
    fn missing_skill_fails_without_writing() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let result = ClaudeToGemini::new(src.path(), out.path()).convert();
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.files.is_empty());
        assert!(!out.path().join("gemini-extension.json").exists());
    }
}

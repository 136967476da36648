//! Platform detection.
//!
//! File presence decides the platform; manifest contents are only extracted
//! as advisory metadata. A parse failure during that secondary extraction is
//! logged and leaves the field empty instead of failing detection.

use std::path::Path;

use serde::Serialize;

use crate::catalog::{
    DEFAULT_CONTEXT_FILE, GEMINI_MANIFEST_FILE, MARKETPLACE_FILE, SHARED_SIGNALS, SKILL_FILE,
};
use crate::error::{PortError, Result};
use crate::frontmatter::{self, Frontmatter};
use crate::manifest::{GeminiManifest, Marketplace, read_json};
use crate::types::{Confidence, Platform};

/// What was found in a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub platform: Platform,
    pub files_found_claude: Vec<String>,
    pub files_found_gemini: Vec<String>,
    pub shared_files: Vec<String>,
    pub confidence: Confidence,
    pub metadata: DetectionMetadata,
}

/// Best-effort parsed contents of the detected documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude: Option<Frontmatter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<Marketplace>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiManifest>,
}

impl DetectionResult {
    /// Fail with [`PortError::DetectionAmbiguous`] when nothing was recognized.
    pub fn require_known(&self, dir: &Path) -> Result<Platform> {
        match self.platform {
            Platform::Unknown => Err(PortError::DetectionAmbiguous(dir.to_path_buf())),
            platform => Ok(platform),
        }
    }
}

/// Inspect `dir` and classify it.
///
/// Fails only when `dir` is not an existing directory. An unrecognized
/// directory yields [`Platform::Unknown`] with low confidence.
pub fn detect(dir: &Path) -> Result<DetectionResult> {
    if !dir.is_dir() {
        return Err(PortError::NotFound(dir.to_path_buf()));
    }

    let mut claude_files = Vec::new();
    let mut gemini_files = Vec::new();
    let mut metadata = DetectionMetadata::default();

    // Claude entry document: must carry a metadata block.
    let skill_path = dir.join(SKILL_FILE);
    if skill_path.is_file() {
        match std::fs::read_to_string(&skill_path) {
            Ok(content) if frontmatter::has_block(&content) => {
                claude_files.push(SKILL_FILE.to_owned());
                metadata.claude = Some(frontmatter::extract(&content));
            }
            Ok(_) => {
                tracing::debug!(path = %skill_path.display(), "SKILL.md has no frontmatter");
            }
            Err(e) => {
                tracing::warn!(path = %skill_path.display(), error = %e, "failed to read SKILL.md");
            }
        }
    }

    // Claude marketplace manifest: must be valid JSON.
    let marketplace_path = dir.join(MARKETPLACE_FILE);
    if marketplace_path.is_file() && is_json(&marketplace_path) {
        claude_files.push(MARKETPLACE_FILE.to_owned());
        metadata.marketplace = advisory(read_json::<Marketplace>(&marketplace_path));
    }

    // Gemini manifest: must be valid JSON.
    let manifest_path = dir.join(GEMINI_MANIFEST_FILE);
    if manifest_path.is_file() && is_json(&manifest_path) {
        gemini_files.push(GEMINI_MANIFEST_FILE.to_owned());
        metadata.gemini = advisory(read_json::<GeminiManifest>(&manifest_path));
    }

    // Gemini context document: declared name first, then the default.
    let context_file = metadata
        .gemini
        .as_ref()
        .map_or(DEFAULT_CONTEXT_FILE, GeminiManifest::context_file)
        .to_owned();
    if dir.join(&context_file).is_file() {
        gemini_files.push(context_file);
    } else if context_file != DEFAULT_CONTEXT_FILE && dir.join(DEFAULT_CONTEXT_FILE).is_file() {
        gemini_files.push(DEFAULT_CONTEXT_FILE.to_owned());
    }

    let shared_files = SHARED_SIGNALS
        .iter()
        .filter(|name| dir.join(name).exists())
        .map(|name| (*name).to_owned())
        .collect();

    let platform = match (!claude_files.is_empty(), !gemini_files.is_empty()) {
        (true, true) => Platform::Universal,
        (true, false) => Platform::Claude,
        (false, true) => Platform::Gemini,
        (false, false) => Platform::Unknown,
    };
    let confidence = if platform == Platform::Unknown {
        Confidence::Low
    } else {
        Confidence::High
    };

    tracing::debug!(
        dir = %dir.display(),
        platform = %platform,
        claude = claude_files.len(),
        gemini = gemini_files.len(),
        "detection complete"
    );

    Ok(DetectionResult {
        platform,
        files_found_claude: claude_files,
        files_found_gemini: gemini_files,
        shared_files,
        confidence,
        metadata,
    })
}

fn is_json(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .is_some()
}

fn advisory<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable manifest metadata");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILL: &str = "---\nname: demo\ndescription: A demo skill.\n---\n# Demo\n";

    #[test]
    fn missing_directory_is_not_found() {
        let err = detect(Path::new("/nonexistent/skillport/dir")).unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[test]
    fn skill_only_is_claude() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("SKILL.md"), SKILL).unwrap();

        let result = detect(tmp.path()).unwrap();
        assert_eq!(result.platform, Platform::Claude);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.files_found_claude, vec!["SKILL.md"]);
        assert_eq!(
            result.metadata.claude.as_ref().and_then(|fm| fm.scalar("name")),
            Some("demo")
        );
    }

    #[test]
    fn skill_without_frontmatter_does_not_count() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("SKILL.md"), "# No block").unwrap();
        let result = detect(tmp.path()).unwrap();
        assert_eq!(result.platform, Platform::Unknown);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn both_layouts_are_universal() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("SKILL.md"), SKILL).unwrap();
        std::fs::write(
            tmp.path().join("gemini-extension.json"),
            r#"{"name": "demo", "version": "1.0.0"}"#,
        )
        .unwrap();

        let result = detect(tmp.path()).unwrap();
        assert_eq!(result.platform, Platform::Universal);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.metadata.gemini.is_some());
    }

    #[test]
    fn empty_directory_is_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let result = detect(tmp.path()).unwrap();
        assert_eq!(result.platform, Platform::Unknown);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.require_known(tmp.path()).is_err());
    }

    #[test]
    fn invalid_json_manifest_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("gemini-extension.json"), "{ nope").unwrap();
        assert_eq!(detect(tmp.path()).unwrap().platform, Platform::Unknown);
    }

    #[test]
    fn metadata_parse_errors_are_swallowed() {
        let tmp = tempfile::tempdir().unwrap();
        // Valid JSON, but missing the required version.
        std::fs::write(tmp.path().join("gemini-extension.json"), r#"{"name": "x"}"#).unwrap();
        let result = detect(tmp.path()).unwrap();
        assert_eq!(result.platform, Platform::Gemini);
        assert!(result.metadata.gemini.is_none());
    }

    #[test]
    fn declared_context_file_and_shared_signals() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("gemini-extension.json"),
            r#"{"name": "x", "version": "1.0.0", "contextFileName": "CONTEXT.md"}"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join("CONTEXT.md"), "context").unwrap();
        std::fs::create_dir(tmp.path().join("shared")).unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();

        let result = detect(tmp.path()).unwrap();
        assert_eq!(
            result.files_found_gemini,
            vec!["gemini-extension.json", "CONTEXT.md"]
        );
        assert_eq!(result.shared_files, vec!["shared", "package.json"]);
    }
}

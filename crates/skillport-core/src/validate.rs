//! Structural and content validation of a directory against a platform.
//!
//! Every check records into one [`ValidationResult`]; nothing aborts midway,
//! so a single run reports every problem found. Validation never writes to
//! the filesystem.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::catalog::{
    ALLOWED_TOOLS_KEY, DEFAULT_CONTEXT_FILE, EXTENSION_PATH_TOKEN, GEMINI_MANIFEST_FILE,
    MARKETPLACE_FILE, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MIN_RECOMMENDED_DESCRIPTION_LEN,
    SKILL_FILE, is_known_tool,
};
use crate::frontmatter::{self, unquote};
use crate::types::{Platform, ValidationResult};

static SKILL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("skill name pattern is valid"));

const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".ts", ".py"];

/// Validate `dir` against `platform`.
///
/// [`Platform::Universal`] runs both sets of checks. [`Platform::Unknown`]
/// is itself an error.
pub fn validate(dir: &Path, platform: Platform) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !dir.is_dir() {
        result.error(format!("directory not found: {}", dir.display()));
        return result.finish();
    }

    if platform == Platform::Unknown {
        result.error("could not detect a Claude skill or Gemini extension to validate");
        return result.finish();
    }
    if platform.includes_claude() {
        validate_claude(dir, &mut result);
    }
    if platform.includes_gemini() {
        validate_gemini(dir, &mut result);
    }

    let result = result.finish();
    tracing::debug!(
        dir = %dir.display(),
        platform = %platform,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validation complete"
    );
    result
}

// ---------------------------------------------------------------------------
// Claude
// ---------------------------------------------------------------------------

fn validate_claude(dir: &Path, result: &mut ValidationResult) {
    let skill_path = dir.join(SKILL_FILE);
    match std::fs::read_to_string(&skill_path) {
        Ok(content) => validate_skill_document(&content, result),
        Err(_) if !skill_path.exists() => result.error(format!("missing required file: {SKILL_FILE}")),
        Err(e) => result.error(format!("cannot read {SKILL_FILE}: {e}")),
    }

    let marketplace_path = dir.join(MARKETPLACE_FILE);
    if marketplace_path.is_file() {
        match read_value(&marketplace_path) {
            Ok(value) => validate_marketplace(&value, result),
            Err(reason) => result.error(format!("{MARKETPLACE_FILE}: {reason}")),
        }
    }
}

fn validate_skill_document(content: &str, result: &mut ValidationResult) {
    if !frontmatter::has_block(content) {
        result.error(format!(
            "{SKILL_FILE} must start with a frontmatter block delimited by ---"
        ));
        return;
    }
    let fields = frontmatter::extract(content);

    match fields.scalar("name").map(unquote) {
        None | Some("") => result.error("frontmatter is missing required field `name`"),
        Some(name) => {
            if !SKILL_NAME.is_match(name) {
                result.error(format!(
                    "name `{name}` must contain only lowercase letters, digits, and hyphens"
                ));
            }
            if name.chars().count() > MAX_NAME_LEN {
                result.error(format!("name must be at most {MAX_NAME_LEN} characters"));
            }
        }
    }

    match fields.scalar("description").map(unquote) {
        None | Some("") => result.error("frontmatter is missing required field `description`"),
        Some(description) => {
            let len = description.chars().count();
            if len > MAX_DESCRIPTION_LEN {
                result.error(format!(
                    "description is {len} characters; the maximum is {MAX_DESCRIPTION_LEN}"
                ));
            } else if len < MIN_RECOMMENDED_DESCRIPTION_LEN {
                result.warn(format!(
                    "description is only {len} characters; at least \
                     {MIN_RECOMMENDED_DESCRIPTION_LEN} help Claude decide when to use the skill"
                ));
            }
        }
    }

    if let Some(tools) = frontmatter::list_field(&fields, ALLOWED_TOOLS_KEY) {
        for tool in tools.iter().filter(|t| !is_known_tool(t)) {
            result.warn(format!("{ALLOWED_TOOLS_KEY} contains unrecognized tool `{tool}`"));
        }
    }
}

fn validate_marketplace(value: &Value, result: &mut ValidationResult) {
    let Some(root) = value.as_object() else {
        result.error(format!("{MARKETPLACE_FILE} must be a JSON object"));
        return;
    };

    if !has_string(value, "name") {
        result.error(format!("{MARKETPLACE_FILE} is missing required field `name`"));
    }

    match root.get("metadata") {
        Some(metadata) if metadata.is_object() => {
            for field in ["description", "version"] {
                if metadata.get(field).is_none() {
                    result.warn(format!("{MARKETPLACE_FILE} metadata has no `{field}`"));
                }
            }
        }
        Some(_) => result.error(format!("{MARKETPLACE_FILE} `metadata` must be an object")),
        None => result.warn(format!(
            "{MARKETPLACE_FILE} has no `metadata` (description, version)"
        )),
    }

    match root.get("plugins").and_then(Value::as_array) {
        Some(plugins) if !plugins.is_empty() => {
            for (index, plugin) in plugins.iter().enumerate() {
                for field in ["name", "description"] {
                    if plugin.get(field).is_none() {
                        result.error(format!(
                            "{MARKETPLACE_FILE} plugins[{index}] is missing required field `{field}`"
                        ));
                    }
                }
            }
        }
        _ => result.error(format!(
            "{MARKETPLACE_FILE} must declare a non-empty `plugins` array"
        )),
    }
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

fn validate_gemini(dir: &Path, result: &mut ValidationResult) {
    let manifest_path = dir.join(GEMINI_MANIFEST_FILE);
    if !manifest_path.is_file() {
        result.error(format!("missing required file: {GEMINI_MANIFEST_FILE}"));
        return;
    }
    let manifest = match read_value(&manifest_path) {
        Ok(value) if value.is_object() => value,
        Ok(_) => {
            result.error(format!("{GEMINI_MANIFEST_FILE} must be a JSON object"));
            return;
        }
        Err(reason) => {
            result.error(format!("{GEMINI_MANIFEST_FILE}: {reason}"));
            return;
        }
    };

    match manifest.get("name").and_then(Value::as_str) {
        Some(name) => {
            if let Some(dir_name) = directory_name(dir)
                && dir_name != name
            {
                result.warn(format!(
                    "extension name `{name}` does not match directory name `{dir_name}`"
                ));
            }
        }
        None => result.error(format!("{GEMINI_MANIFEST_FILE} is missing required field `name`")),
    }

    if !has_string(&manifest, "version") {
        result.error(format!(
            "{GEMINI_MANIFEST_FILE} is missing required field `version`"
        ));
    }

    if let Some(servers) = manifest.get("mcpServers") {
        validate_servers(servers, result);
    }

    if let Some(settings) = manifest.get("settings") {
        validate_settings(settings, result);
    }

    if let Some(excluded) = manifest.get("excludeTools") {
        match excluded.as_array() {
            Some(tools) => {
                for tool in tools {
                    match tool.as_str() {
                        Some(name) if is_known_tool(name) => {}
                        Some(name) => {
                            result.warn(format!("excludeTools contains unrecognized tool `{name}`"))
                        }
                        None => result.error("excludeTools entries must be strings"),
                    }
                }
            }
            None => result.error("excludeTools must be an array"),
        }
    }

    let context_file = manifest
        .get("contextFileName")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CONTEXT_FILE);
    if !dir.join(context_file).is_file() {
        result.warn(format!(
            "context file {context_file} not found; Gemini will load no instructions"
        ));
    }
}

fn validate_servers(servers: &Value, result: &mut ValidationResult) {
    let Some(servers) = servers.as_object() else {
        result.error("mcpServers must be an object");
        return;
    };

    for (name, server) in servers {
        if !has_string(server, "command") {
            result.error(format!("mcpServers.{name} is missing required field `command`"));
        }
        let args = server.get("args").and_then(Value::as_array);
        for arg in args.into_iter().flatten().filter_map(Value::as_str) {
            if references_local_binary(arg) {
                result.warn(format!(
                    "mcpServers.{name} argument `{arg}` should use {EXTENSION_PATH_TOKEN}"
                ));
            }
        }
    }
}

/// A relative path to a bundled server script that is not anchored to the
/// extension directory.
fn references_local_binary(arg: &str) -> bool {
    if arg.contains(EXTENSION_PATH_TOKEN) || arg.starts_with(['/', '-', '$']) {
        return false;
    }
    arg.contains("mcp-server") || SCRIPT_EXTENSIONS.iter().any(|ext| arg.ends_with(ext))
}

fn validate_settings(settings: &Value, result: &mut ValidationResult) {
    let Some(settings) = settings.as_array() else {
        result.error("settings must be an array");
        return;
    };

    for (index, setting) in settings.iter().enumerate() {
        match setting.get("name").and_then(Value::as_str) {
            Some(name) => {
                if setting.get("description").is_none() {
                    result.warn(format!("setting `{name}` has no description"));
                }
            }
            None => result.error(format!("settings[{index}] is missing required field `name`")),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_value(path: &Path) -> Result<Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("cannot read: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))
}

fn has_string(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_str).is_some()
}

fn directory_name(dir: &Path) -> Option<String> {
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    dir.file_name().map(|n| n.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_DESCRIPTION: &str =
        "Queries PostgreSQL databases and explains the results in plain English.";

    fn skill(name: &str, description: &str) -> String {
        format!("---\nname: {name}\ndescription: {description}\n---\n# Skill\n")
    }

    fn claude_dir(content: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("SKILL.md"), content).unwrap();
        tmp
    }

    #[test]
    fn valid_skill() {
        let tmp = claude_dir(&skill("db-helper", LONG_DESCRIPTION));
        let result = validate(tmp.path(), Platform::Claude);
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn uppercase_name_is_an_error() {
        let tmp = claude_dir(&skill("\"My-Skill\"", LONG_DESCRIPTION));
        let result = validate(tmp.path(), Platform::Claude);
        assert!(!result.valid);
        assert!(result.errors[0].contains("lowercase"));
    }

    #[test]
    fn long_name_is_an_error() {
        let tmp = claude_dir(&skill(&"a".repeat(65), LONG_DESCRIPTION));
        let result = validate(tmp.path(), Platform::Claude);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("64"));
    }

    #[test]
    fn short_description_only_warns() {
        let tmp = claude_dir(&skill("db-helper", &"x".repeat(40)));
        let result = validate(tmp.path(), Platform::Claude);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn oversized_description_is_an_error() {
        let tmp = claude_dir(&skill("db-helper", &"x".repeat(1100)));
        let result = validate(tmp.path(), Platform::Claude);
        assert!(!result.valid);
        assert!(result.errors[0].contains("1100"));
    }

    #[test]
    fn missing_frontmatter_and_file() {
        let tmp = claude_dir("# no block");
        assert!(!validate(tmp.path(), Platform::Claude).valid);

        let empty = tempfile::tempdir().unwrap();
        let result = validate(empty.path(), Platform::Claude);
        assert_eq!(result.errors, vec!["missing required file: SKILL.md"]);
    }

    #[test]
    fn marketplace_errors_are_aggregated() {
        let tmp = claude_dir(&skill("db-helper", LONG_DESCRIPTION));
        std::fs::create_dir(tmp.path().join(".claude-plugin")).unwrap();
        std::fs::write(
            tmp.path().join(".claude-plugin/marketplace.json"),
            r#"{"plugins": [{"name": "a"}, {"description": "b"}]}"#,
        )
        .unwrap();
        let result = validate(tmp.path(), Platform::Claude);
        assert_eq!(result.errors.len(), 3, "{:?}", result.errors);
        assert!(result.errors.iter().any(|e| e.contains("plugins[0]")));
        assert!(result.errors.iter().any(|e| e.contains("plugins[1]")));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn empty_plugins_is_an_error() {
        let tmp = claude_dir(&skill("db-helper", LONG_DESCRIPTION));
        std::fs::create_dir(tmp.path().join(".claude-plugin")).unwrap();
        std::fs::write(
            tmp.path().join(".claude-plugin/marketplace.json"),
            r#"{"name": "m", "metadata": {"description": "d", "version": "1.0.0"}, "plugins": []}"#,
        )
        .unwrap();
        let result = validate(tmp.path(), Platform::Claude);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("non-empty"));
    }

    fn gemini_dir(manifest: &str) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("gemini-extension.json"), manifest).unwrap();
        tmp
    }

    #[test]
    fn gemini_manifest_rules() {
        let tmp = gemini_dir(
            r#"{
                "name": "ext",
                "mcpServers": {
                    "good": {"command": "node", "args": ["${extensionPath}/mcp-server/index.js"]},
                    "bare": {"command": "node", "args": ["mcp-server/index.js", "--port", "8080"]},
                    "broken": {"args": []}
                },
                "settings": [{"name": "API_KEY"}, {"description": "nameless"}],
                "excludeTools": "Bash"
            }"#,
        );
        let result = validate(tmp.path(), Platform::Gemini);
        assert!(!result.valid);
        let joined = result.errors.join("\n");
        assert!(joined.contains("`version`"));
        assert!(joined.contains("mcpServers.broken"));
        assert!(joined.contains("settings[1]"));
        assert!(joined.contains("excludeTools must be an array"));
        assert_eq!(result.errors.len(), 4);

        let warnings = result.warnings.join("\n");
        assert!(warnings.contains("mcpServers.bare"));
        assert!(!warnings.contains("mcpServers.good"));
        assert!(warnings.contains("setting `API_KEY` has no description"));
        assert!(warnings.contains("GEMINI.md"));
        assert!(warnings.contains("does not match directory name"));
    }

    #[test]
    fn unparseable_manifest() {
        let tmp = gemini_dir("{,}");
        let result = validate(tmp.path(), Platform::Gemini);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("invalid JSON"));
    }

    #[test]
    fn universal_runs_both_sides() {
        let tmp = claude_dir(&skill("db-helper", LONG_DESCRIPTION));
        let result = validate(tmp.path(), Platform::Universal);
        assert_eq!(result.errors, vec!["missing required file: gemini-extension.json"]);
    }

    #[test]
    fn unknown_platform_and_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!validate(tmp.path(), Platform::Unknown).valid);
        assert!(!validate(Path::new("/nonexistent/skillport"), Platform::Claude).valid);
    }

    #[test]
    fn binary_reference_heuristic() {
        assert!(references_local_binary("mcp-server/index.js"));
        assert!(references_local_binary("server.py"));
        assert!(!references_local_binary("${extensionPath}/server.py"));
        assert!(!references_local_binary("/usr/lib/server.js"));
        assert!(!references_local_binary("--verbose"));
        assert!(!references_local_binary("@modelcontextprotocol/server-github"));
    }
}

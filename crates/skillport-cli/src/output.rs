//! Terminal rendering.
//!
//! Human output is plain text with `[+]` (done), `[!]` (warning) and `[x]`
//! (error) markers. JSON output is pretty-printed serde.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use skillport_adapters::{ForkOutcome, PullRequest};
use skillport_core::frontmatter::FieldValue;
use skillport_core::{ConversionResult, DetectionResult, Platform, ValidationResult};

/// Pretty JSON followed by a newline.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "  {title}");
    let _ = writeln!(out, "  {}", "=".repeat(title.chars().count()));
    let _ = writeln!(out);
}

fn messages(out: &mut String, warnings: &[String], errors: &[String]) {
    for warning in warnings {
        let _ = writeln!(out, "  [!] {warning}");
    }
    for error in errors {
        let _ = writeln!(out, "  [x] {error}");
    }
}

fn file_list(files: &[String]) -> String {
    if files.is_empty() {
        "(none)".to_owned()
    } else {
        files.join(", ")
    }
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

pub fn detection(dir: &Path, result: &DetectionResult) -> String {
    let mut out = String::new();
    heading(&mut out, &format!("Analysis of {}", dir.display()));

    let _ = writeln!(out, "  Platform:         {}", result.platform.display_name());
    let _ = writeln!(out, "  Confidence:       {}", result.confidence);
    let _ = writeln!(out, "  Claude files:     {}", file_list(&result.files_found_claude));
    let _ = writeln!(out, "  Gemini files:     {}", file_list(&result.files_found_gemini));
    let _ = writeln!(out, "  Shared:           {}", file_list(&result.shared_files));

    if let Some(fields) = &result.metadata.claude {
        let _ = writeln!(out);
        let _ = writeln!(out, "  SKILL.md frontmatter:");
        for (key, value) in fields.iter() {
            let rendered = match value {
                FieldValue::Scalar(s) => s.clone(),
                FieldValue::List(items) => format!("[{}]", items.join(", ")),
            };
            let _ = writeln!(out, "    {key}: {rendered}");
        }
    }

    if let Some(manifest) = &result.metadata.gemini {
        let _ = writeln!(out);
        let _ = writeln!(out, "  gemini-extension.json:");
        let _ = writeln!(out, "    name: {}", manifest.name);
        let _ = writeln!(out, "    version: {}", manifest.version);
        if let Some(servers) = &manifest.mcp_servers {
            let names: Vec<&str> = servers.iter().map(|(name, _)| name).collect();
            let _ = writeln!(out, "    mcpServers: {}", names.join(", "));
        }
        if let Some(excluded) = &manifest.exclude_tools {
            let _ = writeln!(out, "    excludeTools: {}", excluded.len());
        }
    }

    let _ = writeln!(out);
    match result.platform {
        Platform::Claude => {
            let _ = writeln!(out, "  Next: `skillport convert {}` adds Gemini CLI support", dir.display());
        }
        Platform::Gemini => {
            let _ = writeln!(out, "  Next: `skillport convert {}` adds Claude Code support", dir.display());
        }
        Platform::Universal => {
            let _ = writeln!(out, "  [+] Works with both Claude Code and Gemini CLI");
        }
        Platform::Unknown => {
            let _ = writeln!(out, "  [x] No SKILL.md or gemini-extension.json found");
        }
    }
    out
}

// ---------------------------------------------------------------------------
// convert / universal
// ---------------------------------------------------------------------------

pub fn conversion(result: &ConversionResult) -> String {
    let mut out = String::new();
    let meta = &result.metadata;
    let source = meta.source.map_or("unknown", Platform::display_name);
    let target = meta.target.map_or("unknown", Platform::display_name);
    heading(&mut out, &format!("Conversion: {source} -> {target}"));

    if let Some(name) = &meta.name {
        let version = meta.version.as_deref().unwrap_or("-");
        let _ = writeln!(out, "  Name:             {name} ({version})");
        let _ = writeln!(out, "  MCP servers:      {}", meta.server_count);
        let _ = writeln!(out, "  Settings:         {}", meta.settings_count);
        if !meta.tools.is_empty() {
            let label = if meta.target == Some(Platform::Gemini) {
                "Excluded tools:"
            } else {
                "Allowed tools:"
            };
            let _ = writeln!(out, "  {label:<18}{}", meta.tools.join(", "));
        }
        let _ = writeln!(out);
    }

    for file in &result.files {
        let _ = writeln!(out, "  [+] Wrote {}", file.display());
    }
    messages(&mut out, &result.warnings, &result.errors);

    let _ = writeln!(out);
    if result.success {
        let _ = writeln!(out, "  Conversion succeeded.");
    } else {
        let _ = writeln!(out, "  Conversion failed.");
    }
    out
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub fn validation(dir: &Path, platform: Platform, result: &ValidationResult) -> String {
    let mut out = String::new();
    heading(
        &mut out,
        &format!("Validation of {} ({})", dir.display(), platform.display_name()),
    );

    messages(&mut out, &result.warnings, &result.errors);
    if result.valid {
        let _ = writeln!(out, "  [+] Valid");
    }
    let _ = writeln!(
        out,
        "\n  {} error(s), {} warning(s)",
        result.errors.len(),
        result.warnings.len()
    );
    out
}

// ---------------------------------------------------------------------------
// create-pr / fork
// ---------------------------------------------------------------------------

pub fn pull_request(pr: &PullRequest) -> String {
    let mut out = conversion(&pr.conversion);
    let _ = writeln!(out, "  [+] Pushed branch {}", pr.branch);
    let _ = writeln!(out, "  [+] Opened pull request: {}", pr.url);
    out
}

pub fn fork(outcome: &ForkOutcome) -> String {
    let mut out = String::new();
    heading(&mut out, "Fork");
    let _ = writeln!(out, "  [+] Created {}", outcome.path.display());
    for file in &outcome.conversion.files {
        let _ = writeln!(out, "  [+] Wrote {}", file.display());
    }
    for link in &outcome.links {
        let _ = writeln!(out, "  [+] Linked {}", link.display());
    }
    messages(&mut out, &outcome.warnings, &[]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_uses_markers() {
        let result = ValidationResult {
            valid: false,
            errors: vec!["name is bad".into()],
            warnings: vec!["description is short".into()],
        };
        let text = validation(Path::new("skill"), Platform::Claude, &result);
        assert!(text.contains("  [!] description is short\n"));
        assert!(text.contains("  [x] name is bad\n"));
        assert!(!text.contains("[+] Valid"));
        assert!(text.contains("1 error(s), 1 warning(s)"));
    }

    #[test]
    fn conversion_lists_files_and_outcome() {
        let mut result = ConversionResult {
            success: true,
            files: vec!["out/GEMINI.md".into()],
            ..Default::default()
        };
        result.metadata.source = Some(Platform::Claude);
        result.metadata.target = Some(Platform::Gemini);
        result.metadata.name = Some("db-helper".into());
        result.metadata.tools = vec!["Edit".into(), "Glob".into()];

        let text = conversion(&result);
        assert!(text.contains("Conversion: Claude Code -> Gemini CLI"));
        assert!(text.contains("  [+] Wrote out/GEMINI.md"));
        assert!(text.contains("Excluded tools:   Edit, Glob"));
        assert!(text.contains("Conversion succeeded."));
    }

    #[test]
    fn json_ends_with_newline() {
        let text = json(&ValidationResult::default()).unwrap();
        assert!(text.starts_with('{'));
        assert!(text.ends_with("}\n"));
    }
}

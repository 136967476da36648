//! Settings inference.
//!
//! Gemini extensions declare their configurable values up front as a list of
//! settings; Claude skills only reference environment variables inside their
//! MCP server definitions. This module scans server environment maps for
//! `${NAME}` placeholders and synthesizes one [`SettingDescriptor`] per
//! distinct name.
//!
//! The enrichment is best effort: descriptions, secrecy, and defaults come
//! from name heuristics. Every produced descriptor is structurally valid
//! (non-empty name and description) regardless of how good the guess is.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{SECRET_MARKERS, known_default, known_description};
use crate::types::{ServerMap, SettingDescriptor};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// All placeholder names referenced in `value`, in order.
pub fn placeholders(value: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(value)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Whether `value` is exactly one `${NAME}` placeholder.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len())
}

/// Infer settings from every server's environment map.
///
/// Deduplicated by name; first-seen order across servers (in document order)
/// is preserved.
pub fn infer_settings(servers: &ServerMap) -> Vec<SettingDescriptor> {
    let mut settings: Vec<SettingDescriptor> = Vec::new();

    for (server_name, server) in servers.iter() {
        for (_, value) in server.env.iter() {
            for name in placeholders(value) {
                if settings.iter().any(|s| s.name == name) {
                    continue;
                }
                tracing::debug!(server = server_name, variable = name, "inferred setting");
                settings.push(describe(name));
            }
        }
    }

    settings
}

/// Synthesize a descriptor for one variable name.
pub fn describe(name: &str) -> SettingDescriptor {
    let description = known_description(name)
        .map(str::to_owned)
        .unwrap_or_else(|| title_case(name));
    let sensitive = is_sensitive(name);

    SettingDescriptor {
        name: name.to_owned(),
        description,
        secret: sensitive.then_some(true),
        required: sensitive.then_some(true),
        default: known_default(name).map(str::to_owned),
    }
}

/// Whether a variable name looks like it holds a credential.
pub fn is_sensitive(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SECRET_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// `GITHUB_API_URL` -> `Github Api Url`.
fn title_case(name: &str) -> String {
    let words: Vec<String> = name
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        name.to_owned()
    } else {
        words.join(" ")
    }
}

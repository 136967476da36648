//! Tool-permission mapping between Claude's whitelist (`allowed-tools`) and
//! Gemini's blacklist (`excludeTools`).
//!
//! Both views are complements relative to [`TOOL_UNIVERSE`]. The mapping is
//! not perfectly invertible: when a whitelist allows more known tools than
//! its complement would exclude, the whitelist-to-blacklist direction gives up
//! and emits an empty blacklist (permit everything) flagged as
//! [`Fidelity::Approximate`]. This lossy case is intentional.

use serde::Serialize;

use crate::catalog::{TOOL_UNIVERSE, is_known_tool};

/// Whether a mapping is the exact complement of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    Exact,
    Approximate,
}

/// Result of mapping one permission view onto the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionMapping {
    /// Output tokens in universe order.
    pub tools: Vec<String>,
    pub fidelity: Fidelity,
    /// Input tokens outside the universe. Kept for reporting only.
    pub unrecognized: Vec<String>,
}

impl PermissionMapping {
    /// Advisory messages describing any loss in this mapping.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.fidelity == Fidelity::Approximate {
            warnings.push(
                "allowed-tools permits more tools than it excludes; emitting an empty \
                 excludeTools list, so the tool restriction may not translate exactly"
                    .to_owned(),
            );
        }
        if !self.unrecognized.is_empty() {
            warnings.push(format!(
                "unrecognized tool names left unmapped: {}",
                self.unrecognized.join(", ")
            ));
        }
        warnings
    }
}

/// Map a whitelist of allowed tools to the blacklist of excluded tools.
pub fn whitelist_to_blacklist<S: AsRef<str>>(allowed: &[S]) -> PermissionMapping {
    let allowed = distinct(allowed);
    let excluded = complement(&allowed);
    let unrecognized = unrecognized(&allowed);
    // Unknown tokens never reach the blacklist, so they do not count here.
    let recognized = allowed.len() - unrecognized.len();

    if excluded.len() < recognized {
        tracing::warn!(
            allowed = recognized,
            excluded = excluded.len(),
            "tool whitelist broader than its complement; emitting empty blacklist"
        );
        return PermissionMapping {
            tools: Vec::new(),
            fidelity: Fidelity::Approximate,
            unrecognized,
        };
    }

    PermissionMapping {
        tools: excluded,
        fidelity: Fidelity::Exact,
        unrecognized,
    }
}

/// Map a blacklist of excluded tools to the whitelist of allowed tools.
pub fn blacklist_to_whitelist<S: AsRef<str>>(excluded: &[S]) -> PermissionMapping {
    let excluded = distinct(excluded);
    PermissionMapping {
        tools: complement(&excluded),
        fidelity: Fidelity::Exact,
        unrecognized: unrecognized(&excluded),
    }
}

fn distinct<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.as_ref().trim();
        if !token.is_empty() && !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen
}

fn complement(tokens: &[&str]) -> Vec<String> {
    TOOL_UNIVERSE
        .iter()
        .filter(|tool| !tokens.contains(tool))
        .map(|tool| (*tool).to_owned())
        .collect()
}

fn unrecognized(tokens: &[&str]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !is_known_tool(t))
        .map(|t| (*t).to_owned())
        .collect()
}

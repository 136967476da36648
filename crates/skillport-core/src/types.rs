//! Shared type definitions: platforms, server configurations, settings
//! descriptors, and the ephemeral result records produced per invocation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PortError;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Which schema(s) a directory matches, or which schema a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Claude skill (`SKILL.md` plus optional marketplace manifest).
    Claude,
    /// Gemini extension (`gemini-extension.json` plus context file).
    Gemini,
    /// Both layouts present.
    Universal,
    /// Neither layout recognized.
    Unknown,
}

impl Platform {
    /// Whether the Claude layout is part of this platform.
    pub fn includes_claude(self) -> bool {
        matches!(self, Self::Claude | Self::Universal)
    }

    /// Whether the Gemini layout is part of this platform.
    pub fn includes_gemini(self) -> bool {
        matches!(self, Self::Gemini | Self::Universal)
    }

    /// The single-schema platform on the other side of a conversion.
    pub fn opposite(self) -> Option<Self> {
        match self {
            Self::Claude => Some(Self::Gemini),
            Self::Gemini => Some(Self::Claude),
            Self::Universal | Self::Unknown => None,
        }
    }

    /// Human-facing product name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude Code",
            Self::Gemini => "Gemini CLI",
            Self::Universal => "Claude Code and Gemini CLI",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claude => write!(f, "claude"),
            Self::Gemini => write!(f, "gemini"),
            Self::Universal => write!(f, "universal"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Platform {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "gemini" => Ok(Self::Gemini),
            "universal" | "both" => Ok(Self::Universal),
            _ => Err(PortError::UnsupportedPlatform(s.to_owned())),
        }
    }
}

/// Detection confidence. Binary: high whenever a platform was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ordered string-keyed map
// ---------------------------------------------------------------------------

/// A string-keyed map that keeps document order.
///
/// Server maps and environment maps are iterated in the order they were
/// written, which makes settings inference deterministic (first seen wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedMap<V>(IndexMap<String, V>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a new map by transforming every value, keeping keys and order.
    pub fn map_values<U>(&self, mut f: impl FnMut(&V) -> U) -> OrderedMap<U> {
        OrderedMap(self.0.iter().map(|(k, v)| (k.clone(), f(v))).collect())
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ---------------------------------------------------------------------------
// Server configuration
// ---------------------------------------------------------------------------

/// One named MCP server entry, shared by both schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Launch command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Ordered argument list. May reference the extension path placeholder.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables. Values may be `${NAME}` placeholders.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub env: OrderedMap<String>,

    /// Any other keys (`cwd`, `timeout`, `url`, ...) carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Named server configurations in document order.
pub type ServerMap = OrderedMap<ServerConfig>;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// One externally configurable value of a Gemini extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDescriptor {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl SettingDescriptor {
    pub fn is_secret(&self) -> bool {
        self.secret.unwrap_or(false)
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of validating a directory against a platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Recompute `valid` from the collected errors.
    pub(crate) fn finish(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }
}

/// Summary information attached to a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Platform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Platform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub server_count: usize,

    #[serde(default)]
    pub settings_count: usize,

    /// Tools excluded (Gemini target) or allowed (Claude target).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

/// Outcome of a conversion run.
///
/// File emission is at-least-once, not atomic: on failure, files listed in
/// `files` were already written and are left in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metadata: ConversionMetadata,
}

impl ConversionResult {
    /// Fold another result into this one (used by universal setup).
    pub fn merge(&mut self, other: Self) {
        self.success = self.success && other.success;
        self.files.extend(other.files);
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        self.metadata = other.metadata;
    }
}

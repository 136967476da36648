//! Fixed configuration data shared by the mapper, the inference engine, the
//! converters, and the validator.
//!
//! Nothing here is discovered at runtime. The capability universe is closed:
//! tokens outside it are carried through conversions but never reasoned about.

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

/// Claude skill entry document.
pub const SKILL_FILE: &str = "SKILL.md";

/// Claude plugin marketplace manifest, relative to the skill root.
pub const MARKETPLACE_FILE: &str = ".claude-plugin/marketplace.json";

/// Directory holding the marketplace manifest.
pub const MARKETPLACE_DIR: &str = ".claude-plugin";

/// Project-level MCP server configuration read by Claude Code.
pub const MCP_CONFIG_FILE: &str = ".mcp.json";

/// Gemini extension manifest.
pub const GEMINI_MANIFEST_FILE: &str = "gemini-extension.json";

/// Default Gemini context document, used when the manifest does not name one.
pub const DEFAULT_CONTEXT_FILE: &str = "GEMINI.md";

/// Presence-only signals shared by both layouts.
pub const SHARED_SIGNALS: &[&str] = &["shared", "mcp-server", "package.json"];

/// Shared documentation directory created next to converted files.
pub const SHARED_DOCS_DIR: &str = "shared";

/// Placeholder documents written into a freshly created shared directory.
pub const SHARED_DOC_FILES: &[(&str, &str)] = &[
    (
        "reference.md",
        "# Reference\n\nDetailed reference documentation shared by the Claude skill and the \
         Gemini extension.\n",
    ),
    (
        "examples.md",
        "# Examples\n\nUsage examples shared by the Claude skill and the Gemini extension.\n",
    ),
];

// ---------------------------------------------------------------------------
// Field names and tokens
// ---------------------------------------------------------------------------

/// Frontmatter key holding the Claude permission whitelist.
pub const ALLOWED_TOOLS_KEY: &str = "allowed-tools";

/// Path placeholder Gemini expands to the extension install directory.
pub const EXTENSION_PATH_TOKEN: &str = "${extensionPath}";

/// Version used when neither side declares one.
pub const DEFAULT_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Capability universe
// ---------------------------------------------------------------------------

/// Every tool name the permission mapper knows, in canonical order.
///
/// Mapper output always follows this order, never input order.
pub const TOOL_UNIVERSE: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "Glob",
    "Grep",
    "Bash",
    "Task",
    "WebFetch",
    "WebSearch",
    "TodoWrite",
    "AskUserQuestion",
    "SlashCommand",
    "Skill",
    "NotebookEdit",
    "BashOutput",
    "KillShell",
];

/// Whether `token` belongs to the capability universe.
pub fn is_known_tool(token: &str) -> bool {
    TOOL_UNIVERSE.contains(&token)
}

// ---------------------------------------------------------------------------
// Settings inference tables
// ---------------------------------------------------------------------------

/// Well-known variable names and their human-readable descriptions.
pub const KNOWN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("DB_HOST", "Database server hostname"),
    ("DB_PORT", "Database server port"),
    ("DB_NAME", "Database name"),
    ("DB_USER", "Database username"),
    ("DB_PASSWORD", "Database password"),
    ("DATABASE_URL", "Database connection URL"),
    ("API_KEY", "API key for authentication"),
    ("API_URL", "API endpoint URL"),
    ("API_BASE_URL", "Base URL for API requests"),
    ("AUTH_TOKEN", "Authentication token"),
    ("LOG_LEVEL", "Logging verbosity level"),
    ("TIMEOUT", "Request timeout in seconds"),
    ("PORT", "Port the server listens on"),
    ("HOST", "Hostname the server binds to"),
];

/// Common defaults for well-known variable names.
pub const KNOWN_DEFAULTS: &[(&str, &str)] = &[
    ("DB_HOST", "localhost"),
    ("DB_PORT", "5432"),
    ("LOG_LEVEL", "info"),
    ("TIMEOUT", "30"),
    ("HOST", "localhost"),
    ("PORT", "3000"),
];

/// Substrings (matched case-insensitively) that mark a variable as secret.
pub const SECRET_MARKERS: &[&str] = &["password", "secret", "token", "key"];

/// Look up a well-known description.
pub fn known_description(name: &str) -> Option<&'static str> {
    lookup(KNOWN_DESCRIPTIONS, name)
}

/// Look up a well-known default value.
pub fn known_default(name: &str) -> Option<&'static str> {
    lookup(KNOWN_DEFAULTS, name)
}

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

// ---------------------------------------------------------------------------
// Validation limits
// ---------------------------------------------------------------------------

/// Maximum skill name length.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum skill description length.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Descriptions shorter than this draw a warning.
pub const MIN_RECOMMENDED_DESCRIPTION_LEN: usize = 50;

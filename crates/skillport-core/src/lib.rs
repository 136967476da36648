//! Conversion between Claude Code skills and Gemini CLI extensions.
//!
//! This crate provides:
//!
//! - **Detection** — classifies a directory as a Claude skill, a Gemini
//!   extension, both, or neither, with the parsed metadata of each side.
//!
//! - **Permission mapping** — translates Claude's `allowed-tools` whitelist
//!   into Gemini's `excludeTools` blacklist and back, over a fixed universe
//!   of sixteen tools.
//!
//! - **Settings inference** — derives Gemini setting descriptors from the
//!   `${VAR}` placeholders in MCP server environments.
//!
//! - **Converters** — write the missing side of a project, fencing generated
//!   prose so that repeated round trips do not accumulate boilerplate.
//!
//! - **Validation** — checks either layout against its platform's rules and
//!   reports every error and warning in one pass.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use skillport_core::{Platform, convert, validate};
//!
//! let dir = Path::new("db-helper");
//! let result = convert(dir, Some(Platform::Gemini), None);
//! assert!(result.success);
//!
//! let report = validate(dir, Platform::Gemini);
//! println!("{} errors, {} warnings", report.errors.len(), report.warnings.len());
//! ```

pub mod catalog;
pub mod convert;
pub mod detect;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod manifest;
pub mod permissions;
pub mod settings;
pub mod types;
pub mod validate;

pub use convert::{ClaudeToGemini, Converter, GeminiToClaude, convert, make_universal};
pub use detect::{DetectionResult, detect};
pub use error::{PortError, Result};
pub use frontmatter::{FieldValue, Frontmatter};
pub use loader::{ClaudeSkill, GeminiExtension, load_claude_skill, load_gemini_extension};
pub use manifest::{GeminiManifest, Marketplace};
pub use permissions::{Fidelity, PermissionMapping, blacklist_to_whitelist, whitelist_to_blacklist};
pub use settings::infer_settings;
pub use types::{
    Confidence, ConversionMetadata, ConversionResult, OrderedMap, Platform, ServerConfig,
    ServerMap, SettingDescriptor, ValidationResult,
};
pub use validate::validate;

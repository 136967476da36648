//! Error types for detection, conversion, and validation.

use std::path::PathBuf;

/// Errors surfaced by the core engine.
///
/// Structural failures (missing directory, missing required file, unparseable
/// manifest) are reported through this type. Advisory problems never are:
/// they become warnings on a [`crate::ConversionResult`] or
/// [`crate::ValidationResult`].
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("directory not found: `{0}`")]
    NotFound(PathBuf),

    #[error("missing required file `{file}` in `{dir}`")]
    MissingRequiredFile { dir: PathBuf, file: String },

    #[error("malformed document `{path}`: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("unsupported platform: `{0}` (expected claude, gemini, or universal)")]
    UnsupportedPlatform(String),

    #[error("nothing to convert: {0}")]
    NothingToConvert(String),

    #[error("could not detect a Claude skill or Gemini extension in `{0}`")]
    DetectionAmbiguous(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PortError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(dir: impl Into<PathBuf>, file: impl Into<String>) -> Self {
        Self::MissingRequiredFile {
            dir: dir.into(),
            file: file.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PortError>;

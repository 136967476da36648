//! Adapter error types.
//!
//! Workflows surface errors through [`AdapterError`]. A failed external
//! command carries its stderr verbatim so callers can show it unchanged.

use skillport_core::PortError;

/// Unified error type for skillport adapters.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The program could not be started (not installed, not executable).
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited non-zero.
    #[error("`{program}` failed (exit {status}): {stderr}")]
    CommandFailed {
        program: String,
        status: i32,
        stderr: String,
    },

    /// The program exceeded its time limit and was killed.
    #[error("timeout after {seconds}s: `{program}`")]
    Timeout { seconds: u64, program: String },

    /// A workflow prerequisite does not hold.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The conversion step of a workflow reported failure.
    #[error("conversion failed: {0}")]
    ConversionFailed(String),

    /// An I/O operation failed within the adapter.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Port(#[from] PortError),
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, AdapterError>;

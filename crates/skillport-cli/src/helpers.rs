//! Shared helpers for the CLI.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with the given default log level.
///
/// `verbose` forces debug; otherwise `RUST_LOG` wins when set. Logs go to
/// stderr so stdout carries only command output (and stays parseable with
/// `--json`).
pub fn init_tracing(default_level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

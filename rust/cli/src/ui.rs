//! UI helper functions for terminal output formatting.
//!
//! Consistent prefixes for errors and warnings across commands, plus the
//! stderr `tracing` subscriber the binary installs.

use std::io::Write;

use tracing_subscriber::EnvFilter;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Installs a `warn` level subscriber writing to stderr. `RUST_LOG`
/// overrides the level. Calling it twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

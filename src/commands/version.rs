//! Command: print version information.
use std::io::Write;

use anyhow::{Context as _, Result};

/// Version string, overridable at build time through `MYENV_VERSION`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("MYENV_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the myenv version to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "myenv {}", version()).context("writing version")
}

//! Command: print the shell startup script.
use std::io::Write;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::Environment;
use crate::shell;

/// Run the profile command, writing `export` lines and then the login script
/// lines of all active profiles to `out`.
///
/// Nothing is written if the environment sections conflict.
///
/// # Errors
///
/// Returns an error if profile loading fails, the environment sections are
/// malformed or conflicting, or `out` cannot be written.
pub fn run(
    global: &GlobalOpts,
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
    out: &mut dyn Write,
) -> Result<()> {
    let setup = CommandSetup::init(global, env, log)?;
    let active = setup.active(env, executor, log)?;

    let exports = shell::build_exports(&active, env)?;
    let login = shell::login_lines(&active, log)?;

    for line in shell::render_exports(&exports).iter().chain(&login) {
        writeln!(out, "{line}").context("writing profile script")?;
    }
    out.flush().context("writing profile script")?;
    Ok(())
}

//! Command: show discovered profiles and whether they are active.
use std::io::Write;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::Environment;

/// Run the list command, writing one `<state>  <name>` line per profile.
///
/// # Errors
///
/// Returns an error if profile loading or selector evaluation fails.
pub fn run(
    global: &GlobalOpts,
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
    out: &mut dyn Write,
) -> Result<()> {
    let setup = CommandSetup::init(global, env, log)?;
    let active = setup.active(env, executor, log)?;

    for profile in setup.registry.profiles() {
        let state = if !profile.valid {
            "invalid"
        } else if active.iter().any(|p| p.name == profile.name) {
            "active"
        } else {
            "inactive"
        };
        writeln!(out, "{state:<8}  {}", profile.name).context("writing profile list")?;
    }
    Ok(())
}

//! Command: run `git` inside the profile storage directory.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::storage;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::Environment;

/// Start `git <args>` in the storage directory and return immediately.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be resolved, `git` is
/// not on `PATH`, or the process cannot be started.
pub fn run(
    global: &GlobalOpts,
    args: &[String],
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let storage = storage::prepare(&storage::resolve(global.dir.as_deref(), env)?, env)?;
    if !executor.which("git") {
        anyhow::bail!("git not found on PATH");
    }
    log.debug(&format!(
        "running git {} in {}",
        args.join(" "),
        storage.display()
    ));
    executor.spawn_detached(&storage, "git", args)
}

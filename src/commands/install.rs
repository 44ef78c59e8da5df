//! Command: reconcile `$HOME` with the active profiles.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::config::profiles::Profile;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::Environment;
use crate::tasks::copies::{self, InstallCopies};
use crate::tasks::symlinks::{self, InstallSymlinks, RemoveStaleSymlinks};
use crate::tasks::{self, Context, Task};

/// Run the install command.
///
/// Every symlink and copy is planned and validated before anything in the
/// home directory is touched; a configuration error leaves it unchanged.
///
/// # Errors
///
/// Returns an error if profile loading or planning fails, or if a task fails.
pub fn run(
    global: &GlobalOpts,
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let setup = CommandSetup::init(global, env, log)?;
    let active = setup.active(env, executor, log)?;
    log.info(&format!(
        "{} of {} profiles active",
        active.len(),
        setup.registry.profiles().len()
    ));

    let all_tasks = plan(&active, &setup, env)?;
    let ctx = Context::new(log, global.dry_run, &setup.home, &setup.storage);
    tasks::run_tasks_to_completion(&all_tasks, &ctx);

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}

/// Build and validate the install task list.
///
/// # Errors
///
/// Returns the first configuration error found in any active profile.
pub fn plan(
    active: &[&Profile],
    setup: &CommandSetup,
    env: &dyn Environment,
) -> Result<Vec<Box<dyn Task>>> {
    let links = symlinks::desired_symlinks(active, &setup.home, env)?;
    symlinks::validate(&links)?;
    let copy_plans = active
        .iter()
        .map(|profile| copies::desired_copies(profile, &setup.home, env))
        .collect::<Result<Vec<_>, _>>()?;

    let all_tasks: Vec<Box<dyn Task>> = vec![
        Box::new(RemoveStaleSymlinks::new(&links)),
        Box::new(InstallSymlinks::new(links)),
        Box::new(InstallCopies::new(copy_plans)),
    ];
    Ok(all_tasks)
}

//! Named tasks that apply planned resource changes during `install`.
mod context;
/// Tasks that install profile copies.
pub mod copies;
/// Tasks that install profile symlinks and remove stale ones.
pub mod symlinks;

pub use context::Context;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::ContextError;
use crate::logging::TaskStatus;
use crate::platform::{self, Environment};

/// Result of a single task execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task finished but some entries could not be applied.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use myenv::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 3, already_ok: 10, skipped: 0 };
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items that failed and were skipped.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context<'_>) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else if self.skipped > 0 {
            TaskResult::Skipped(format!("{} failed", self.skipped))
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
    }
}

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task has anything to do.
    fn should_run(&self, ctx: &Context<'_>) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot run at all. Failures of single
    /// entries are logged and counted instead.
    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context<'_>) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (nothing to do)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Run every task in order.
pub fn run_tasks_to_completion(tasks: &[Box<dyn Task>], ctx: &Context<'_>) {
    for task in tasks {
        execute(task.as_ref(), ctx);
    }
}

/// Resolve one `target -> source` descriptor entry to absolute paths.
///
/// The key is expanded and joined with `home` when relative; the value is
/// expanded and joined with the profile directory.
///
/// # Errors
///
/// Returns [`ContextError`] if expansion needs an unavailable home directory.
pub fn resolve_entry(
    key: &str,
    value: &str,
    profile_dir: &Path,
    home: &Path,
    env: &dyn Environment,
) -> Result<(PathBuf, PathBuf), ContextError> {
    let target = platform::resolve_against(key, home, env)?;
    let source = profile_dir.join(platform::expand(value, env)?);
    Ok((target, source))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;
    use crate::platform::test_helpers::FakeEnvironment;

    struct Fixed(Result<TaskResult, &'static str>, bool);

    impl Task for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn should_run(&self, _: &Context<'_>) -> bool {
            self.1
        }
        fn run(&self, _: &Context<'_>) -> Result<TaskResult> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn ctx(log: &RecordingLog, dry_run: bool) -> Context<'_> {
        Context::new(log, dry_run, Path::new("/home/u"), Path::new("/home/u/.myenv"))
    }

    #[test]
    fn stats_summary_includes_skipped_when_nonzero() {
        let stats = TaskStats {
            changed: 1,
            already_ok: 2,
            skipped: 3,
        };
        assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
    }

    #[test]
    fn stats_add_assign() {
        let mut a = TaskStats::new();
        a += TaskStats {
            changed: 1,
            already_ok: 1,
            skipped: 0,
        };
        a += TaskStats {
            changed: 2,
            already_ok: 0,
            skipped: 1,
        };
        assert_eq!(
            a,
            TaskStats {
                changed: 3,
                already_ok: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn finish_reports_failures_as_skipped() {
        let log = RecordingLog::default();
        let stats = TaskStats {
            changed: 0,
            already_ok: 0,
            skipped: 2,
        };
        assert_eq!(
            stats.finish(&ctx(&log, false)),
            TaskResult::Skipped("2 failed".to_string())
        );
        assert_eq!(stats.finish(&ctx(&log, true)), TaskResult::DryRun);
    }

    #[test]
    fn execute_records_each_outcome() {
        let log = RecordingLog::default();
        let c = ctx(&log, false);
        execute(&Fixed(Ok(TaskResult::Ok), true), &c);
        execute(&Fixed(Ok(TaskResult::Ok), false), &c);
        execute(&Fixed(Err("boom"), true), &c);
        let statuses: Vec<TaskStatus> = log.tasks().iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TaskStatus::Ok,
                TaskStatus::NotApplicable,
                TaskStatus::Failed
            ]
        );
        assert_eq!(log.messages("error"), vec!["fixed: boom".to_string()]);
    }

    #[test]
    fn resolve_entry_joins_home_and_profile() {
        let env = FakeEnvironment::new("/home/u", "box");
        let (target, source) = resolve_entry(
            ".vimrc",
            "vim/vimrc",
            Path::new("/home/u/.myenv/base"),
            Path::new("/home/u"),
            &env,
        )
        .unwrap();
        assert_eq!(target, PathBuf::from("/home/u/.vimrc"));
        assert_eq!(source, PathBuf::from("/home/u/.myenv/base/vim/vimrc"));
    }

    #[test]
    fn resolve_entry_keeps_absolute_and_tilde_targets() {
        let env = FakeEnvironment::new("/home/u", "box");
        let (target, _) =
            resolve_entry("~/.config/x", "x", Path::new("/p"), Path::new("/home/u"), &env).unwrap();
        assert_eq!(target, PathBuf::from("/home/u/.config/x"));
        let (target, _) =
            resolve_entry("/etc/x", "x", Path::new("/p"), Path::new("/home/u"), &env).unwrap();
        assert_eq!(target, PathBuf::from("/etc/x"));
    }
}

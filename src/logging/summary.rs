//! Per-task outcomes collected for the end-of-run summary.
use std::fmt;

/// One line of the run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name as shown to the user.
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Extra detail, such as how many entries failed.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every entry was applied or already correct.
    Ok,
    /// The task had no entries for the active profiles.
    NotApplicable,
    /// Some entries failed; the others were applied.
    Skipped,
    /// Changes were only logged because of `--dry-run`.
    DryRun,
    /// The task aborted.
    Failed,
}

impl TaskStatus {
    /// Summary marker and its ANSI colour.
    #[must_use]
    pub const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

impl fmt::Display for TaskEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (icon, color) = self.status.marker();
        write!(f, "{color}{icon} {}", self.name)?;
        if let Some(message) = &self.message {
            write!(f, " ({message})")?;
        }
        f.write_str("\x1b[0m")
    }
}

/// Number of tasks per [`TaskStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    ok: usize,
    not_applicable: usize,
    skipped: usize,
    dry_run: usize,
    failed: usize,
}

impl Tally {
    /// Count the statuses of `entries`.
    #[must_use]
    pub fn of(entries: &[TaskEntry]) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            let slot = match entry.status {
                TaskStatus::Ok => &mut tally.ok,
                TaskStatus::NotApplicable => &mut tally.not_applicable,
                TaskStatus::Skipped => &mut tally.skipped,
                TaskStatus::DryRun => &mut tally.dry_run,
                TaskStatus::Failed => &mut tally.failed,
            };
            *slot += 1;
        }
        tally
    }

    /// Number of failed tasks.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Total number of tasks counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.not_applicable + self.skipped + self.dry_run + self.failed
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks: \x1b[32m{} ok\x1b[0m, \x1b[2m{} n/a\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
            self.total(),
            self.ok,
            self.not_applicable,
            self.skipped,
            self.dry_run,
            self.failed
        )
    }
}

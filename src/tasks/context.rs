use std::path::{Path, PathBuf};

use crate::logging::Log;

/// Shared context for task execution.
pub struct Context<'a> {
    /// Logger for output and task recording.
    pub log: &'a dyn Log,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// Profile storage directory.
    pub storage: PathBuf,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("storage", &self.storage)
            .finish()
    }
}

impl<'a> Context<'a> {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(log: &'a dyn Log, dry_run: bool, home: &Path, storage: &Path) -> Self {
        Self {
            log,
            dry_run,
            home: home.to_path_buf(),
            storage: storage.to_path_buf(),
        }
    }
}

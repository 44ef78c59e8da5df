//! Symlink resource.
use std::path::PathBuf;

use super::helpers::fs::{self, EntryKind};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::{ConfigError, FilesystemError};

/// A symlink from `target` (in the home directory) to `source` (in a
/// profile directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkResource {
    /// The file or directory the link points to.
    pub source: PathBuf,
    /// Where the link is created.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Check that whatever occupies the target may be replaced by the
    /// source.
    ///
    /// Existing links are always replaceable. A real directory may only be
    /// replaced by a directory source and a regular file only by a file
    /// source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TargetKindMismatch`] or
    /// [`ConfigError::UnsupportedFileType`].
    pub fn validate_replace(&self) -> Result<(), ConfigError> {
        let mismatch = |found| ConfigError::TargetKindMismatch {
            target: self.target.clone(),
            source_path: self.source.clone(),
            found,
        };
        match EntryKind::of(&self.target) {
            EntryKind::Missing | EntryKind::Symlink => Ok(()),
            EntryKind::Directory if self.source.is_dir() => Ok(()),
            EntryKind::Directory => Err(mismatch("directory")),
            EntryKind::File if self.source.is_file() => Ok(()),
            EntryKind::File => Err(mismatch("file")),
            EntryKind::Other => Err(ConfigError::UnsupportedFileType {
                path: self.target.clone(),
            }),
        }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn clear(&self) -> Result<(), FilesystemError> {
        fs::remove_entry(&self.target).map_err(|source| FilesystemError::Remove {
            target: self.target.clone(),
            source,
        })
    }

    fn apply(&self) -> Result<ResourceChange, FilesystemError> {
        if fs::links_to(&self.target, &self.source) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        fs::create_symlink(&self.source, &self.target).map_err(|source| FilesystemError::Link {
            target: self.target.clone(),
            source,
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> ResourceState {
        match EntryKind::of(&self.target) {
            EntryKind::Missing => ResourceState::Missing,
            EntryKind::Symlink if fs::links_to(&self.target, &self.source) => {
                ResourceState::Correct
            }
            EntryKind::Symlink => ResourceState::Incorrect {
                current: std::fs::read_link(&self.target).map_or_else(
                    |_| "unreadable link".to_string(),
                    |existing| format!("points to {}", existing.display()),
                ),
            },
            EntryKind::Directory => ResourceState::Incorrect {
                current: "real directory".to_string(),
            },
            EntryKind::File => ResourceState::Incorrect {
                current: "regular file".to_string(),
            },
            EntryKind::Other => ResourceState::Invalid {
                reason: "unsupported file type".to_string(),
            },
        }
    }
}

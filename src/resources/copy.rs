//! Copied file or directory resource.
use std::io;
use std::path::PathBuf;

use super::helpers::fs::{self, EntryKind};
use super::{Applicable, ResourceChange};
use crate::error::{ConfigError, FilesystemError};

/// A file or directory tree copied from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyResource {
    /// File or directory in a profile.
    pub source: PathBuf,
    /// Destination path.
    pub target: PathBuf,
}

impl CopyResource {
    /// Create a copy resource, checking that the source is a regular file or
    /// a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSource`] if the source does not exist
    /// and [`ConfigError::UnsupportedFileType`] if it is something else.
    pub fn new(key: &str, source: PathBuf, target: PathBuf) -> Result<Self, ConfigError> {
        if !source.exists() {
            return Err(ConfigError::MissingSource {
                key: key.to_string(),
                path: source,
            });
        }
        if !source.is_file() && !source.is_dir() {
            return Err(ConfigError::UnsupportedFileType { path: source });
        }
        Ok(Self { source, target })
    }

    fn copy_error(&self, source: io::Error) -> FilesystemError {
        FilesystemError::Copy {
            from: self.source.clone(),
            target: self.target.clone(),
            source,
        }
    }
}

impl Applicable for CopyResource {
    fn description(&self) -> String {
        format!("{} <- {}", self.target.display(), self.source.display())
    }

    fn clear(&self) -> Result<(), FilesystemError> {
        fs::remove_entry(&self.target).map_err(|source| FilesystemError::Remove {
            target: self.target.clone(),
            source,
        })
    }

    fn apply(&self) -> Result<ResourceChange, FilesystemError> {
        fs::ensure_parent_dir(&self.target).map_err(|e| self.copy_error(e))?;
        let result = if self.source.is_dir() {
            fs::copy_dir_recursive(&self.source, &self.target)
        } else if self.source.is_file() {
            fs::copy_file_preserving(&self.source, &self.target)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                "source is no longer a file or directory",
            ))
        };
        result.map_err(|e| self.copy_error(e))?;
        Ok(ResourceChange::Applied)
    }
}

/// Returns `true` if something (including a dangling link) occupies `target`.
#[must_use]
pub fn target_occupied(resource: &CopyResource) -> bool {
    EntryKind::of(&resource.target) != EntryKind::Missing
}

//! Profile discovery and activation.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::DESCRIPTOR_FILE;
use super::profiles::Profile;
use crate::error::ContextError;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::selector::EvalContext;

/// Every profile found in the storage directory.
#[derive(Debug, Clone)]
pub struct Registry {
    profiles: Vec<Profile>,
}

impl Registry {
    /// Load every subdirectory of `storage` that directly contains a
    /// descriptor file.
    ///
    /// Profiles are ordered by directory name so that activation order does
    /// not depend on the filesystem's listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if `storage` cannot be listed or a profile fails to
    /// load.
    pub fn discover(storage: &Path, fs: &dyn FileSystemOps, log: &dyn Log) -> Result<Self> {
        let mut dirs: Vec<PathBuf> = fs
            .read_dir(storage)
            .with_context(|| format!("listing profiles in {}", storage.display()))?
            .into_iter()
            .filter(|path| fs.is_dir(path) && fs.is_file(&path.join(DESCRIPTOR_FILE)))
            .collect();
        dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let profiles = dirs
            .iter()
            .map(|dir| {
                log.debug(&format!("loading profile {}", dir.display()));
                Profile::load(dir, log)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_profiles(profiles))
    }

    /// Build a registry from already loaded profiles, keeping their order.
    #[must_use]
    pub const fn from_profiles(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// All profiles in discovery order.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// The profiles active in `ctx`, in discovery order.
    ///
    /// # Errors
    ///
    /// Propagates [`ContextError`] from selector evaluation.
    pub fn activate(&self, ctx: &EvalContext<'_>) -> Result<Vec<&Profile>, ContextError> {
        let mut active = Vec::new();
        for profile in &self.profiles {
            if profile.valid && profile.is_active(ctx)? {
                active.push(profile);
            }
        }
        Ok(active)
    }
}

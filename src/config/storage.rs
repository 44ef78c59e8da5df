//! Location of the profile storage directory.
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::ContextError;
use crate::platform::{self, Environment};

/// Environment variable overriding the storage directory.
pub const STORAGE_ENV_VAR: &str = "MYENV_DIR";

/// Default storage directory name under the home directory.
pub const DEFAULT_STORAGE_DIR: &str = ".myenv";

/// Resolve the storage directory: `flag`, else `$MYENV_DIR`, else
/// `~/.myenv`.
///
/// Relative values are taken relative to the home directory.
///
/// # Errors
///
/// Returns [`ContextError::HomeNotSet`] if the home directory is needed and
/// unavailable.
pub fn resolve(flag: Option<&Path>, env: &dyn Environment) -> Result<PathBuf, ContextError> {
    let home = env.home()?;
    let configured = match flag {
        Some(path) => Some(platform::expand(&path.to_string_lossy(), env)?),
        None => env
            .var(STORAGE_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(|v| platform::expand(&v, env))
            .transpose()?,
    };
    Ok(configured.map_or_else(|| home.join(DEFAULT_STORAGE_DIR), |path| home.join(path)))
}

/// Create the storage directory if needed and check that it lies inside the
/// home directory.
///
/// Returns the symlink-free form of `storage`.
///
/// # Errors
///
/// Returns [`ContextError::StorageOutsideHome`] if the directory resolves to
/// a path outside the home directory, or an I/O error if it cannot be
/// created.
pub fn prepare(storage: &Path, env: &dyn Environment) -> anyhow::Result<PathBuf> {
    let home = platform::real_path(&env.home()?);
    let storage = platform::real_path(storage);
    if !storage.starts_with(&home) || storage == home {
        return Err(ContextError::StorageOutsideHome { storage, home }.into());
    }
    std::fs::create_dir_all(&storage)
        .with_context(|| format!("creating {}", storage.display()))?;
    Ok(storage)
}

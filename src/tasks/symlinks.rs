use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats, resolve_entry};
use crate::config::profiles::Profile;
use crate::error::{ConfigError, MyenvError};
use crate::platform::{self, Environment};
use crate::resources::helpers::fs::{self, EntryKind};
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Compute the desired symlinks of all active profiles.
///
/// Entries are ordered by first occurrence of their target; when several
/// profiles link the same target the last one wins. Targets are compared
/// after lexical normalisation, so `sub/../.vimrc` and `.vimrc` collide.
///
/// # Errors
///
/// Returns [`ConfigError`] (wrapped in [`MyenvError`]) if a source is
/// missing, a target resolves to the home directory itself, or an absolute
/// target lies outside the home directory.
pub fn desired_symlinks(
    active: &[&Profile],
    home: &Path,
    env: &dyn Environment,
) -> Result<Vec<SymlinkResource>, MyenvError> {
    let real_home = platform::real_path(home);
    let mut links: Vec<SymlinkResource> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for profile in active {
        for (key, value) in profile.symlinks()? {
            let (target, source) = resolve_entry(&key, &value, &profile.path, home, env)?;
            let in_profile = |e: ConfigError| e.in_profile(&profile.name);

            if !source.exists() {
                return Err(in_profile(ConfigError::MissingSource { key, path: source }).into());
            }
            if platform::real_path(&target) == real_home {
                return Err(in_profile(ConfigError::TargetIsHome { target }).into());
            }
            if platform::expand(&key, env)?.is_absolute() {
                let normal = platform::normalize(&target);
                if !normal.starts_with(home) && !normal.starts_with(&real_home) {
                    return Err(in_profile(ConfigError::TargetOutsideHome { key }).into());
                }
            }

            let target = platform::normalize(&target);
            let resource = SymlinkResource::new(source, target.clone());
            if let Some(&i) = index.get(&target) {
                if let Some(slot) = links.get_mut(i) {
                    *slot = resource;
                }
            } else {
                index.insert(target, links.len());
                links.push(resource);
            }
        }
    }
    Ok(links)
}

/// Check every existing target before anything is removed.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found.
pub fn validate(links: &[SymlinkResource]) -> Result<(), ConfigError> {
    links.iter().try_for_each(SymlinkResource::validate_replace)
}

/// Symlinks directly inside `home` whose target lies under `storage`.
///
/// Relative link targets are resolved against `home`.
#[must_use]
pub fn links_into_storage(home: &Path, storage: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(home) else {
        return Vec::new();
    };
    let real_storage = platform::real_path(storage);
    let mut found: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            std::fs::read_link(path).is_ok_and(|dest| {
                let dest = platform::normalize(&home.join(dest));
                dest.starts_with(storage) || dest.starts_with(&real_storage)
            })
        })
        .collect();
    found.sort();
    found
}

/// Remove links in `$HOME` that point into the profile storage directory.
///
/// Links that already match a desired symlink are kept.
#[derive(Debug)]
pub struct RemoveStaleSymlinks {
    keep: Vec<SymlinkResource>,
}

impl RemoveStaleSymlinks {
    /// Create the task; `desired` links that are already correct survive.
    #[must_use]
    pub fn new(desired: &[SymlinkResource]) -> Self {
        Self {
            keep: desired.to_vec(),
        }
    }

    fn is_kept(&self, path: &Path) -> bool {
        self.keep
            .iter()
            .any(|link| link.target == path && link.current_state() == ResourceState::Correct)
    }
}

impl Task for RemoveStaleSymlinks {
    fn name(&self) -> &str {
        "Remove stale symlinks"
    }

    fn should_run(&self, ctx: &Context<'_>) -> bool {
        ctx.home.is_dir()
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        for path in links_into_storage(&ctx.home, &ctx.storage) {
            if self.is_kept(&path) {
                continue;
            }
            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would remove stale link {}", path.display()));
                stats.changed += 1;
                continue;
            }
            match fs::remove_entry(&path) {
                Ok(()) => {
                    ctx.log.debug(&format!("removed {}", path.display()));
                    stats.changed += 1;
                }
                Err(e) => {
                    ctx.log
                        .warn(&format!("error while removing {}: {e}", path.display()));
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats.finish(ctx))
    }
}

/// Create the desired symlinks, replacing whatever occupies their targets.
#[derive(Debug)]
pub struct InstallSymlinks {
    links: Vec<SymlinkResource>,
}

impl InstallSymlinks {
    /// Create the task for an already validated plan.
    #[must_use]
    pub const fn new(links: Vec<SymlinkResource>) -> Self {
        Self { links }
    }
}

impl Task for InstallSymlinks {
    fn name(&self) -> &str {
        "Install symlinks"
    }

    fn should_run(&self, _ctx: &Context<'_>) -> bool {
        !self.links.is_empty()
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        let pending: Vec<&SymlinkResource> = self
            .links
            .iter()
            .filter(|link| {
                let correct = link.current_state() == ResourceState::Correct;
                if correct {
                    ctx.log.debug(&format!("ok: {} (already linked)", link.target.display()));
                    stats.already_ok += 1;
                }
                !correct
            })
            .collect();

        if ctx.dry_run {
            for link in &pending {
                match link.current_state() {
                    ResourceState::Incorrect { current } => ctx.log.dry_run(&format!(
                        "would replace {} ({current})",
                        link.description()
                    )),
                    _ => ctx.log.dry_run(&format!("would link {}", link.description())),
                }
                stats.changed += 1;
            }
            return Ok(stats.finish(ctx));
        }

        // Destroy phase: nothing is created until every stale target is gone.
        let mut cleared = Vec::with_capacity(pending.len());
        for link in pending {
            if EntryKind::of(&link.target) == EntryKind::Missing {
                cleared.push(link);
                continue;
            }
            match link.clear() {
                Ok(()) => cleared.push(link),
                Err(e) => {
                    ctx.log.warn(&e.to_string());
                    stats.skipped += 1;
                }
            }
        }

        for link in cleared {
            if !link.source.exists() {
                ctx.log.warn(&format!(
                    "source {} does not exist (creating symlink to it anyway)",
                    link.source.display()
                ));
            }
            match link.apply() {
                Ok(ResourceChange::Applied) => {
                    ctx.log.debug(&format!("linked {}", link.description()));
                    stats.changed += 1;
                }
                Ok(ResourceChange::AlreadyCorrect) => stats.already_ok += 1,
                Err(e) => {
                    ctx.log.warn(&e.to_string());
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats.finish(ctx))
    }
}

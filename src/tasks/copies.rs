use std::path::Path;

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats, resolve_entry};
use crate::config::profiles::Profile;
use crate::error::MyenvError;
use crate::platform::Environment;
use crate::resources::copy::{self, CopyResource};
use crate::resources::{Applicable, ResourceChange};

/// Copies declared by one profile.
#[derive(Debug, Clone)]
pub struct ProfileCopies {
    /// Name of the declaring profile.
    pub profile: String,
    /// Planned copies in descriptor order.
    pub copies: Vec<CopyResource>,
}

/// Plan the copies of a single profile.
///
/// # Errors
///
/// Returns [`crate::error::ConfigError`] (wrapped in [`MyenvError`]) when
/// the field is malformed or a source is missing or not a file/directory.
pub fn desired_copies(
    profile: &Profile,
    home: &Path,
    env: &dyn Environment,
) -> Result<ProfileCopies, MyenvError> {
    let mut copies = Vec::new();
    for (key, value) in profile.copies()? {
        let (target, source) = resolve_entry(&key, &value, &profile.path, home, env)?;
        let resource =
            CopyResource::new(&key, source, target).map_err(|e| e.in_profile(&profile.name))?;
        copies.push(resource);
    }
    Ok(ProfileCopies {
        profile: profile.name.clone(),
        copies,
    })
}

/// Copy profile files into place, replacing existing targets.
///
/// Copies are always re-applied. Within each profile every target is
/// removed before any new copy is made.
#[derive(Debug)]
pub struct InstallCopies {
    plans: Vec<ProfileCopies>,
}

impl InstallCopies {
    /// Create the task from per-profile plans in activation order.
    #[must_use]
    pub const fn new(plans: Vec<ProfileCopies>) -> Self {
        Self { plans }
    }

    fn install_profile(plan: &ProfileCopies, ctx: &Context<'_>) -> TaskStats {
        let mut stats = TaskStats::new();
        ctx.log.debug(&format!("copying files of profile {}", plan.profile));

        if ctx.dry_run {
            for resource in &plan.copies {
                ctx.log.dry_run(&format!("would copy {}", resource.description()));
                stats.changed += 1;
            }
            return stats;
        }

        let mut cleared = Vec::with_capacity(plan.copies.len());
        for resource in &plan.copies {
            if !copy::target_occupied(resource) {
                cleared.push(resource);
                continue;
            }
            match resource.clear() {
                Ok(()) => cleared.push(resource),
                Err(e) => {
                    ctx.log.warn(&e.to_string());
                    stats.skipped += 1;
                }
            }
        }

        for resource in cleared {
            match resource.apply() {
                Ok(ResourceChange::Applied) => {
                    ctx.log.debug(&format!("copied {}", resource.description()));
                    stats.changed += 1;
                }
                Ok(ResourceChange::AlreadyCorrect) => stats.already_ok += 1,
                Err(e) => {
                    ctx.log.warn(&e.to_string());
                    stats.skipped += 1;
                }
            }
        }
        stats
    }
}

impl Task for InstallCopies {
    fn name(&self) -> &str {
        "Install copies"
    }

    fn should_run(&self, _ctx: &Context<'_>) -> bool {
        self.plans.iter().any(|plan| !plan.copies.is_empty())
    }

    fn run(&self, ctx: &Context<'_>) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        for plan in &self.plans {
            stats += Self::install_profile(plan, ctx);
        }
        Ok(stats.finish(ctx))
    }
}

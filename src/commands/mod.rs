//! Top-level subcommand orchestration.
pub mod edit;
pub mod git;
pub mod install;
pub mod list;
pub mod profile;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::profiles::Profile;
use crate::config::registry::Registry;
use crate::config::storage;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::operations::SystemFileSystemOps;
use crate::platform::Environment;
use crate::selector::EvalContext;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the home and storage directories and discovers every profile so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Home directory as reported by the environment.
    pub home: PathBuf,
    /// Symlink-free profile storage directory.
    pub storage: PathBuf,
    /// Every discovered profile.
    pub registry: Registry,
}

impl CommandSetup {
    /// Resolve directories and load all profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory is unknown, the storage
    /// directory lies outside it, or any profile fails to load.
    pub fn init(global: &GlobalOpts, env: &dyn Environment, log: &Logger) -> Result<Self> {
        let home = env.home()?;
        let storage = storage::prepare(&storage::resolve(global.dir.as_deref(), env)?, env)?;
        log.debug(&format!("profile directory: {}", storage.display()));

        let registry = Registry::discover(&storage, &SystemFileSystemOps, log)?;
        log.debug(&format!("{} profiles found", registry.profiles().len()));

        Ok(Self {
            home,
            storage,
            registry,
        })
    }

    /// Evaluate selectors and return the active profiles in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector cannot be evaluated.
    pub fn active<'s>(
        &'s self,
        env: &dyn Environment,
        executor: &dyn Executor,
        log: &Logger,
    ) -> Result<Vec<&'s Profile>> {
        let ctx = EvalContext {
            env,
            fs: &SystemFileSystemOps,
            executor,
        };
        let active = self.registry.activate(&ctx)?;
        let names: Vec<&str> = active.iter().map(|p| p.name.as_str()).collect();
        log.debug(&format!("active profiles: {}", names.join(", ")));
        Ok(active)
    }
}

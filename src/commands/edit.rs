//! Commands: create a profile and open its descriptor in an editor.
use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{DESCRIPTOR_FILE, EMPTY_DESCRIPTOR, storage};
use crate::exec::Executor;
use crate::logging::Logger;
use crate::platform::Environment;

/// Editor used when `$EDITOR` is unset.
pub const DEFAULT_EDITOR: &str = "nano";

/// Run the create command.
///
/// # Errors
///
/// Returns an error if the profile already exists, the name is not a plain
/// directory name, or the editor cannot be started.
pub fn create(
    global: &GlobalOpts,
    name: &str,
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let dir = profile_dir(global, name, env)?;
    if dir.exists() {
        anyhow::bail!("profile '{name}' already exists at {}", dir.display());
    }
    let descriptor = scaffold(&dir, global.dry_run, log)?;
    open_editor(&descriptor, global.dry_run, env, executor, log)
}

/// Run the edit command, creating the profile first if it is missing.
///
/// # Errors
///
/// Returns an error if the name is not a plain directory name or the
/// editor cannot be started.
pub fn edit(
    global: &GlobalOpts,
    name: &str,
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let dir = profile_dir(global, name, env)?;
    let descriptor = if dir.join(DESCRIPTOR_FILE).is_file() {
        dir.join(DESCRIPTOR_FILE)
    } else {
        scaffold(&dir, global.dry_run, log)?
    };
    open_editor(&descriptor, global.dry_run, env, executor, log)
}

fn profile_dir(global: &GlobalOpts, name: &str, env: &dyn Environment) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        anyhow::bail!("invalid profile name '{name}': must be a single directory name");
    }
    let storage = storage::prepare(&storage::resolve(global.dir.as_deref(), env)?, env)?;
    Ok(storage.join(name))
}

fn scaffold(dir: &Path, dry_run: bool, log: &Logger) -> Result<PathBuf> {
    let descriptor = dir.join(DESCRIPTOR_FILE);
    if dry_run {
        log.dry_run(&format!("would create {}", descriptor.display()));
        return Ok(descriptor);
    }
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    std::fs::write(&descriptor, EMPTY_DESCRIPTOR)
        .with_context(|| format!("writing {}", descriptor.display()))?;
    log.info(&format!("created {}", descriptor.display()));
    Ok(descriptor)
}

fn open_editor(
    descriptor: &Path,
    dry_run: bool,
    env: &dyn Environment,
    executor: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let editor = env
        .var("EDITOR")
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string());
    let command = format!("{editor} \"{}\"", descriptor.display());
    if dry_run {
        log.dry_run(&format!("would run {command}"));
        return Ok(());
    }
    log.info(&format!("running {command}"));
    let result = executor.run_interactive(&command)?;
    if !result.success {
        log.warn(&format!(
            "editor exited with status {}",
            result
                .code
                .map_or_else(|| "unknown".to_string(), |c| c.to_string())
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::{ExecResult, MockExecutor};
    use crate::platform::test_helpers::FakeEnvironment;

    fn setup() -> (tempfile::TempDir, FakeEnvironment, GlobalOpts) {
        let tmp = tempfile::tempdir().unwrap();
        let env = FakeEnvironment::new(tmp.path(), "box").with_var("EDITOR", "vi");
        let global = GlobalOpts {
            dry_run: false,
            dir: None,
        };
        (tmp, env, global)
    }

    fn editor_expecting(fragment: &'static str) -> MockExecutor {
        let mut executor = MockExecutor::new();
        executor
            .expect_run_interactive()
            .withf(move |cmd| cmd.contains(fragment))
            .times(1)
            .returning(|_| {
                Ok(ExecResult {
                    success: true,
                    code: Some(0),
                })
            });
        executor
    }

    #[test]
    fn create_writes_empty_descriptor_and_opens_editor() {
        let (tmp, env, global) = setup();
        let log = Logger::new("create");
        create(&global, "work", &env, &editor_expecting("vi "), &log).unwrap();
        let descriptor = dunce::canonicalize(tmp.path())
            .unwrap()
            .join(".myenv")
            .join("work")
            .join(DESCRIPTOR_FILE);
        assert_eq!(
            std::fs::read_to_string(descriptor).unwrap(),
            EMPTY_DESCRIPTOR
        );
    }

    #[test]
    fn create_fails_for_existing_profile() {
        let (tmp, env, global) = setup();
        std::fs::create_dir_all(tmp.path().join(".myenv").join("work")).unwrap();
        let log = Logger::new("create");
        let err = create(&global, "work", &env, &MockExecutor::new(), &log).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn edit_keeps_existing_descriptor() {
        let (tmp, env, global) = setup();
        let dir = tmp.path().join(".myenv").join("work");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(DESCRIPTOR_FILE), "{\"env\": {}}").unwrap();
        let log = Logger::new("edit");
        edit(&global, "work", &env, &editor_expecting("profile.json"), &log).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join(DESCRIPTOR_FILE)).unwrap(),
            "{\"env\": {}}"
        );
    }

    #[test]
    fn default_editor_is_nano() {
        let tmp = tempfile::tempdir().unwrap();
        let env = FakeEnvironment::new(tmp.path(), "box");
        let global = GlobalOpts {
            dry_run: false,
            dir: None,
        };
        let log = Logger::new("edit");
        edit(&global, "work", &env, &editor_expecting("nano "), &log).unwrap();
    }

    #[test]
    fn dry_run_creates_nothing() {
        let (tmp, env, _) = setup();
        let global = GlobalOpts {
            dry_run: true,
            dir: None,
        };
        let log = Logger::new("create");
        create(&global, "work", &env, &MockExecutor::new(), &log).unwrap();
        assert!(!tmp.path().join(".myenv").join("work").exists());
    }

    #[test]
    fn path_like_names_are_rejected() {
        let (_tmp, env, global) = setup();
        let log = Logger::new("create");
        for name in ["", "..", "a/b", "/abs"] {
            assert!(
                create(&global, name, &env, &MockExecutor::new(), &log).is_err(),
                "{name:?} should be rejected"
            );
        }
    }
}

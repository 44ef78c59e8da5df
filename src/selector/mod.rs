//! Selector evaluation: decides whether a profile applies to this machine.
//!
//! A profile's `selectors` object is parsed by [`builder::build`] into a list
//! of [`Selector`] nodes that is evaluated as an implicit AND.
pub mod builder;
pub mod host;

use crate::error::ContextError;
use crate::exec::Executor;
use crate::operations::FileSystemOps;
use crate::platform::{self, Environment};

/// A predicate deciding profile activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches the local hostname against any of the listed names.
    Host(Vec<String>),
    /// Active if the expanded path is an existing directory.
    Dir(String),
    /// Active if the expanded path is an existing regular file.
    File(String),
    /// Active if the shell command exits with status 0.
    Cmd(String),
    /// Active if every child is active (true when empty).
    And(Vec<Self>),
    /// Active if any child is active (false when empty).
    Or(Vec<Self>),
    /// Negates its child.
    Not(Box<Self>),
    /// Never active; assigned to profiles whose descriptor failed to parse.
    Never,
}

/// Ambient context a selector is evaluated against.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// Environment variables, home directory and hostname.
    pub env: &'a dyn Environment,
    /// Filesystem queries for `dir` / `file`.
    pub fs: &'a dyn FileSystemOps,
    /// Runs `cmd` selectors.
    pub executor: &'a dyn Executor,
}

impl std::fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("env", &"<dyn Environment>")
            .field("fs", &self.fs)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Selector {
    /// Evaluate this selector.
    ///
    /// `And` and `Or` short-circuit in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] if the hostname or home directory is needed
    /// but unavailable, or if a `cmd` selector's shell cannot be started.
    pub fn is_active(&self, ctx: &EvalContext<'_>) -> Result<bool, ContextError> {
        match self {
            Self::Host(names) => Ok(host::matches(names, &ctx.env.fqdn()?)),
            Self::Dir(path) => Ok(ctx.fs.is_dir(&platform::expand(path, ctx.env)?)),
            Self::File(path) => Ok(ctx.fs.is_file(&platform::expand(path, ctx.env)?)),
            Self::Cmd(command) => {
                let result = ctx.executor.run_shell(command)?;
                tracing::debug!("selector command '{command}' exited with {:?}", result.code);
                Ok(result.success)
            }
            Self::And(children) => all_active(children, ctx),
            Self::Or(children) => {
                for child in children {
                    if child.is_active(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(child) => Ok(!child.is_active(ctx)?),
            Self::Never => Ok(false),
        }
    }
}

/// Returns `true` if every selector in `selectors` is active.
///
/// # Errors
///
/// Propagates the first evaluation error.
pub fn all_active(selectors: &[Selector], ctx: &EvalContext<'_>) -> Result<bool, ContextError> {
    for selector in selectors {
        if !selector.is_active(ctx)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::{ExecResult, MockExecutor};
    use crate::operations::MockFileSystemOps;
    use crate::platform::test_helpers::FakeEnvironment;

    fn env() -> FakeEnvironment {
        FakeEnvironment::new("/home/user", "box.example.com")
    }

    fn eval(selector: &Selector, fs: &MockFileSystemOps) -> bool {
        let env = env();
        let executor = MockExecutor::new();
        let ctx = EvalContext {
            env: &env,
            fs,
            executor: &executor,
        };
        selector.is_active(&ctx).unwrap()
    }

    fn host(name: &str) -> Selector {
        Selector::Host(vec![name.to_string()])
    }

    #[test]
    fn empty_and_is_true() {
        assert!(eval(&Selector::And(vec![]), &MockFileSystemOps::new()));
    }

    #[test]
    fn empty_or_is_false() {
        assert!(!eval(&Selector::Or(vec![]), &MockFileSystemOps::new()));
    }

    #[test]
    fn never_is_false() {
        assert!(!eval(&Selector::Never, &MockFileSystemOps::new()));
    }

    #[test]
    fn not_negates_child() {
        let fs = MockFileSystemOps::new().with_dir("/home/user/work");
        let cases = [
            host("box"),
            host("other"),
            Selector::Dir("~/work".to_string()),
            Selector::File("~/work".to_string()),
            Selector::And(vec![]),
            Selector::Or(vec![]),
            Selector::Never,
        ];
        for child in cases {
            let negated = Selector::Not(Box::new(child.clone()));
            assert_eq!(eval(&negated, &fs), !eval(&child, &fs), "{child:?}");
        }
    }

    #[test]
    fn dir_and_file_expand_home() {
        let fs = MockFileSystemOps::new()
            .with_dir("/home/user/.config")
            .with_file("/home/user/.marker");
        assert!(eval(&Selector::Dir("~/.config".to_string()), &fs));
        assert!(!eval(&Selector::File("~/.config".to_string()), &fs));
        assert!(eval(&Selector::File("~/.marker".to_string()), &fs));
        assert!(!eval(&Selector::Dir("~/.marker".to_string()), &fs));
    }

    #[test]
    fn or_short_circuits_before_command() {
        let env = env();
        let fs = MockFileSystemOps::new();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().never();
        let ctx = EvalContext {
            env: &env,
            fs: &fs,
            executor: &executor,
        };
        let selector = Selector::Or(vec![host("box"), Selector::Cmd("exit 1".to_string())]);
        assert!(selector.is_active(&ctx).unwrap());
    }

    #[test]
    fn and_short_circuits_before_command() {
        let env = env();
        let fs = MockFileSystemOps::new();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().never();
        let ctx = EvalContext {
            env: &env,
            fs: &fs,
            executor: &executor,
        };
        assert!(!all_active(&[host("other"), Selector::Cmd("true".to_string())], &ctx).unwrap());
    }

    #[test]
    fn cmd_is_active_on_zero_exit() {
        let env = env();
        let fs = MockFileSystemOps::new();
        let mut executor = MockExecutor::new();
        executor
            .expect_run_shell()
            .withf(|cmd| cmd == "test -d /opt/work")
            .times(1)
            .returning(|_| {
                Ok(ExecResult {
                    success: true,
                    code: Some(0),
                })
            });
        let ctx = EvalContext {
            env: &env,
            fs: &fs,
            executor: &executor,
        };
        assert!(
            Selector::Cmd("test -d /opt/work".to_string())
                .is_active(&ctx)
                .unwrap()
        );
    }

    #[test]
    fn cmd_spawn_failure_is_error() {
        let env = env();
        let fs = MockFileSystemOps::new();
        let mut executor = MockExecutor::new();
        executor.expect_run_shell().returning(|cmd| {
            Err(ContextError::Command {
                command: cmd.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no shell"),
            })
        });
        let ctx = EvalContext {
            env: &env,
            fs: &fs,
            executor: &executor,
        };
        assert!(Selector::Cmd("true".to_string()).is_active(&ctx).is_err());
    }

    #[test]
    fn dir_without_home_is_context_error() {
        let env = FakeEnvironment::homeless();
        let fs = MockFileSystemOps::new();
        let executor = MockExecutor::new();
        let ctx = EvalContext {
            env: &env,
            fs: &fs,
            executor: &executor,
        };
        let err = Selector::Dir("~/x".to_string()).is_active(&ctx).unwrap_err();
        assert!(matches!(err, ContextError::HomeNotSet));
    }

    #[test]
    fn top_level_list_is_conjunction() {
        let fs = MockFileSystemOps::new().with_dir("/home/user/work");
        let env = env();
        let executor = MockExecutor::new();
        let ctx = EvalContext {
            env: &env,
            fs: &fs,
            executor: &executor,
        };
        assert!(all_active(&[host("box"), Selector::Dir("~/work".to_string())], &ctx).unwrap());
        assert!(!all_active(&[host("box"), Selector::Dir("~/play".to_string())], &ctx).unwrap());
        assert!(all_active(&[], &ctx).unwrap());
    }
}

//! Personal environment manager.
//!
//! Profiles are directories in `~/.myenv`, each with a `profile.json`
//! descriptor. Selectors in the descriptor decide whether a profile is
//! active on the current host; active profiles are reconciled into the home
//! directory as symlinks and copies and contribute environment variables and
//! login script lines to the shell startup script.
//!
//! The public API is organised into layers:
//!
//! - **[`selector`]**: the boolean selector language and its evaluation
//! - **[`config`]**: descriptor parsing, profile loading and discovery
//! - **[`resources`]**: idempotent `check + apply` primitives (symlinks, copies)
//! - **[`tasks`]**: named units of work wired to resources
//! - **[`shell`]**: the generated `export` / login script
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

/// Command-line argument definitions.
pub mod cli;
/// Top-level subcommand implementations.
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod resources;
pub mod selector;
pub mod shell;
pub mod tasks;

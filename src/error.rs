//! Domain-specific error types for the myenv engine.
//!
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! MyenvError
//! ├── Config(ConfigError)           - malformed or invalid descriptor content (fatal)
//! ├── ProfileLoad(ProfileLoadError) - descriptor missing or unreadable (fatal)
//! ├── Filesystem(FilesystemError)   - one entry failed to apply (logged, skipped)
//! └── Context(ContextError)         - home, hostname or shell unavailable (fatal)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the myenv engine.
#[derive(Error, Debug)]
pub enum MyenvError {
    /// Descriptor content is malformed or semantically invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A profile directory could not be loaded.
    #[error("Profile load error: {0}")]
    ProfileLoad(#[from] ProfileLoadError),

    /// A single filesystem entry could not be applied.
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// The ambient context (home directory, hostname, shell) is unavailable.
    #[error("Context error: {0}")]
    Context(#[from] ContextError),
}

/// Errors caused by descriptor content.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A selector key is not one of the known kinds.
    #[error("unknown selector: {kind}")]
    UnknownSelector {
        /// The offending key.
        kind: String,
    },

    /// A selector value has the wrong JSON type.
    #[error("invalid value for \"{kind}\" selector; you need to specify {expected}")]
    InvalidSelector {
        /// Selector kind whose value is malformed.
        kind: String,
        /// Human-readable description of the accepted shape.
        expected: &'static str,
    },

    /// A `not` selector does not wrap exactly one condition.
    #[error(
        "invalid value for \"not\" selector; found {count} conditions, \
         specify exactly one (use and/or to combine multiple conditions)"
    )]
    NotArity {
        /// Number of entries found in the `not` object.
        count: usize,
    },

    /// Wraps another configuration error with the name of the profile it came from.
    #[error("profile '{profile}': {cause}")]
    InProfile {
        /// Name of the profile whose descriptor is invalid.
        profile: String,
        /// The underlying configuration error.
        #[source]
        cause: Box<ConfigError>,
    },

    /// A top-level descriptor field has the wrong JSON type.
    #[error("field \"{field}\" must be {expected}")]
    InvalidField {
        /// Name of the descriptor field.
        field: String,
        /// Human-readable description of the accepted shape.
        expected: &'static str,
    },

    /// An environment variable value is neither a string nor a list of strings.
    #[error("value for environment variable \"{name}\" is invalid; should be a string or a list of strings")]
    InvalidEnvValue {
        /// Name of the environment variable.
        name: String,
    },

    /// An environment variable changed representation between profiles.
    #[error(
        "environment variable \"{name}\" is specified as a {found} but an earlier profile made it a {expected}"
    )]
    EnvRepresentation {
        /// Name of the environment variable.
        name: String,
        /// Representation established by an earlier profile.
        expected: &'static str,
        /// Representation found in the current profile.
        found: &'static str,
    },

    /// The resolved source of an entry does not exist.
    #[error("{key} is defined but its source {} does not exist", path.display())]
    MissingSource {
        /// Descriptor key naming the entry.
        key: String,
        /// Resolved source path.
        path: PathBuf,
    },

    /// An entry would replace the entire home directory.
    #[error("{} points to your entire home directory", target.display())]
    TargetIsHome {
        /// Resolved target path.
        target: PathBuf,
    },

    /// An absolute symlink target lies outside the home directory.
    #[error("symlink {key} is not inside $HOME")]
    TargetOutsideHome {
        /// Descriptor key naming the entry.
        key: String,
    },

    /// An existing target cannot be replaced by a source of a different kind.
    #[error("{} is a {found} but its source {} is not", target.display(), source_path.display())]
    TargetKindMismatch {
        /// Existing target path.
        target: PathBuf,
        /// Source path that would replace it.
        source_path: PathBuf,
        /// Kind of the existing target (`"directory"` or `"file"`).
        found: &'static str,
    },

    /// A path is neither a regular file, a directory nor a symlink.
    #[error("unsupported file type: {} (must be a file or directory)", path.display())]
    UnsupportedFileType {
        /// Offending path.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Attach the name of the profile this error originated from.
    #[must_use]
    pub fn in_profile(self, profile: &str) -> Self {
        Self::InProfile {
            profile: profile.to_string(),
            cause: Box::new(self),
        }
    }
}

/// Errors raised while loading a profile directory.
#[derive(Error, Debug)]
pub enum ProfileLoadError {
    /// The directory does not contain a descriptor file.
    #[error("{} does not exist", path.display())]
    MissingDescriptor {
        /// Expected descriptor path.
        path: PathBuf,
    },

    /// The descriptor exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Per-entry failures while applying desired state.
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// A symlink could not be created.
    #[error("error while creating {}: {source}", target.display())]
    Link {
        /// Link path.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file or directory could not be copied.
    #[error("error while copying {} to {}: {source}", from.display(), target.display())]
    Copy {
        /// Copy source.
        from: PathBuf,
        /// Copy destination.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An existing entry could not be removed.
    #[error("error while removing {}: {source}", target.display())]
    Remove {
        /// Path being removed.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file referenced by a profile could not be read.
    #[error("error while reading {}: {source}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors resolving the ambient context.
#[derive(Error, Debug)]
pub enum ContextError {
    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot determine home directory: neither HOME nor USERPROFILE is set")]
    HomeNotSet,

    /// The system hostname could not be read.
    #[error("cannot determine hostname: {0}")]
    Hostname(#[source] std::io::Error),

    /// The profile storage directory is outside the home directory.
    #[error(
        "profile directory should be within your home directory ({} is not inside {})",
        storage.display(),
        home.display()
    )]
    StorageOutsideHome {
        /// Resolved storage directory.
        storage: PathBuf,
        /// Resolved home directory.
        home: PathBuf,
    },

    /// A trusted shell command could not be started.
    #[error("cannot run command '{command}': {source}")]
    Command {
        /// The command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

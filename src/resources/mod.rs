//! Idempotent filesystem primitives (check, clear, apply).
pub mod copy;
pub mod symlink;

/// Shared filesystem helpers.
pub mod helpers {
    pub mod fs;
}

use crate::error::FilesystemError;

/// Minimal interface for resources that can be described, cleared, and
/// applied.
///
/// Copies are always refreshed and implement only this trait. Resources that
/// can determine their own state implement the richer [`Resource`]
/// super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Remove whatever currently occupies the target path.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::Remove`] if the existing entry cannot be
    /// removed.
    fn clear(&self) -> Result<(), FilesystemError>;

    /// Create the resource at its (now vacant) target path.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesystemError`] describing the entry that failed.
    fn apply(&self) -> Result<ResourceChange, FilesystemError>;
}

/// State of a resource target.
///
/// # Examples
///
/// ```
/// use myenv::resources::ResourceState;
///
/// let wrong = ResourceState::Incorrect { current: "regular file".into() };
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target.
    Missing,
    /// The target already matches the desired state.
    Correct,
    /// Something exists at the target but does not match.
    Incorrect {
        /// Description of what is there now.
        current: String,
    },
    /// The target cannot be replaced.
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
}

/// Resources that can inspect their own target.
pub trait Resource: Applicable {
    /// Check the current state of the target.
    fn current_state(&self) -> ResourceState;
}

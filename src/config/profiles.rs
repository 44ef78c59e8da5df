//! A profile: one directory of user configuration plus its descriptor.
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::env::{self, EnvValue};
use super::{DESCRIPTOR_FILE, document};
use crate::error::{ConfigError, ContextError, MyenvError, ProfileLoadError};
use crate::logging::Log;
use crate::selector::{self, EvalContext, Selector, builder};

/// A named profile loaded from a directory.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Directory name; unique within a registry.
    pub name: String,
    /// Absolute profile directory; relative sources resolve against it.
    pub path: PathBuf,
    /// Parsed descriptor. Fields other than `selectors` are read on demand.
    pub document: Map<String, Value>,
    /// Top-level selectors (an implicit AND), or `None` if the descriptor
    /// declares none.
    pub selectors: Option<Vec<Selector>>,
    /// `false` if the descriptor could not be parsed.
    pub valid: bool,
}

impl Profile {
    /// Load the profile stored in `dir`.
    ///
    /// A descriptor that is not a JSON object yields an invalid profile that
    /// is never active; a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileLoadError`] if the descriptor is missing or
    /// unreadable and [`ConfigError`] if its selector tree is malformed.
    pub fn load(dir: &Path, log: &dyn Log) -> Result<Self, MyenvError> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let descriptor = dir.join(DESCRIPTOR_FILE);
        if !descriptor.is_file() {
            return Err(ProfileLoadError::MissingDescriptor { path: descriptor }.into());
        }
        let text = std::fs::read_to_string(&descriptor).map_err(|source| ProfileLoadError::Io {
            path: descriptor.clone(),
            source,
        })?;
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(document)) => Ok(Self::from_document(&name, dir, document)?),
            Ok(_) => {
                log.warn(&format!(
                    "profile '{name}' has invalid {DESCRIPTOR_FILE}: expected a JSON object; ignoring profile"
                ));
                Ok(Self::invalid(&name, dir))
            }
            Err(e) => {
                log.warn(&format!(
                    "profile '{name}' has invalid {DESCRIPTOR_FILE}: {e}; ignoring profile"
                ));
                Ok(Self::invalid(&name, dir))
            }
        }
    }

    /// Build a valid profile from an already parsed descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InProfile`] if the selector tree is malformed.
    pub fn from_document(
        name: &str,
        path: &Path,
        document: Map<String, Value>,
    ) -> Result<Self, ConfigError> {
        let selectors = document::object(&document, document::SELECTORS)
            .and_then(|tree| tree.map(builder::build).transpose())
            .map_err(|e| e.in_profile(name))?;
        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            document,
            selectors,
            valid: true,
        })
    }

    /// A profile whose descriptor failed to parse.
    #[must_use]
    pub fn invalid(name: &str, path: &Path) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            document: Map::new(),
            selectors: Some(vec![Selector::Never]),
            valid: false,
        }
    }

    /// Whether this profile applies in `ctx`.
    ///
    /// A profile without selectors is always active.
    ///
    /// # Errors
    ///
    /// Propagates [`ContextError`] from selector evaluation.
    pub fn is_active(&self, ctx: &EvalContext<'_>) -> Result<bool, ContextError> {
        self.selectors
            .as_deref()
            .map_or(Ok(true), |selectors| selector::all_active(selectors, ctx))
    }

    /// Declared symlinks as `(target, source)` pairs in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the field has the wrong shape.
    pub fn symlinks(&self) -> Result<Vec<(String, String)>, ConfigError> {
        document::string_map(&self.document, document::SYMLINKS)
            .map_err(|e| e.in_profile(&self.name))
    }

    /// Declared copies as `(target, source)` pairs in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the field has the wrong shape.
    pub fn copies(&self) -> Result<Vec<(String, String)>, ConfigError> {
        document::string_map(&self.document, document::COPIES)
            .map_err(|e| e.in_profile(&self.name))
    }

    /// Declared environment variables in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the field has the wrong shape.
    pub fn env(&self) -> Result<Vec<(String, EnvValue)>, ConfigError> {
        env::parse(&self.document).map_err(|e| e.in_profile(&self.name))
    }

    /// Login script file names, relative to the profile directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the field has the wrong shape.
    pub fn onlogin(&self) -> Result<Vec<String>, ConfigError> {
        document::string_list(&self.document, document::ONLOGIN)
            .map_err(|e| e.in_profile(&self.name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;
    use serde_json::json;
    use std::fs;

    fn write_profile(root: &Path, name: &str, descriptor: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DESCRIPTOR_FILE), descriptor).unwrap();
        dir
    }

    #[test]
    fn load_reads_selectors_and_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_profile(tmp.path(), "work", r#"{"selectors": {"host": "box"}}"#);
        let profile = Profile::load(&dir, &RecordingLog::default()).unwrap();
        assert_eq!(profile.name, "work");
        assert!(profile.valid);
        assert_eq!(
            profile.selectors,
            Some(vec![Selector::Host(vec!["box".to_string()])])
        );
    }

    #[test]
    fn load_without_selectors_has_none() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_profile(tmp.path(), "base", "{\n}\n");
        let profile = Profile::load(&dir, &RecordingLog::default()).unwrap();
        assert!(profile.selectors.is_none());
    }

    #[test]
    fn missing_descriptor_is_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Profile::load(tmp.path(), &RecordingLog::default()).unwrap_err();
        assert!(matches!(
            err,
            MyenvError::ProfileLoad(ProfileLoadError::MissingDescriptor { .. })
        ));
    }

    #[test]
    fn malformed_json_marks_profile_invalid_and_warns() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_profile(tmp.path(), "broken", "{ not json");
        let log = RecordingLog::default();
        let profile = Profile::load(&dir, &log).unwrap();
        assert!(!profile.valid);
        assert_eq!(profile.selectors, Some(vec![Selector::Never]));
        let warnings = log.messages("warn");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("broken"));
    }

    #[test]
    fn non_object_json_marks_profile_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_profile(tmp.path(), "list", "[1, 2]");
        let profile = Profile::load(&dir, &RecordingLog::default()).unwrap();
        assert!(!profile.valid);
    }

    #[test]
    fn bad_selector_tree_is_fatal_and_names_profile() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_profile(tmp.path(), "odd", r#"{"selectors": {"user": "me"}}"#);
        let err = Profile::load(&dir, &RecordingLog::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: profile 'odd': unknown selector: user"
        );
    }

    #[test]
    fn selectors_must_be_object() {
        let doc = json!({"selectors": ["host"]}).as_object().cloned().unwrap();
        let err = Profile::from_document("p", Path::new("/p"), doc).unwrap_err();
        assert!(matches!(err, ConfigError::InProfile { .. }));
    }

    #[test]
    fn field_errors_carry_profile_name() {
        let doc = json!({"symlinks": {"~/.a": 3}}).as_object().cloned().unwrap();
        let profile = Profile::from_document("p", Path::new("/p"), doc).unwrap();
        let err = profile.symlinks().unwrap_err();
        assert!(err.to_string().starts_with("profile 'p': "));
    }

    #[test]
    fn accessors_read_declared_fields() {
        let doc = json!({
            "symlinks": {"~/.vimrc": "vimrc"},
            "copies": {"~/.ssh/config": "ssh_config"},
            "env": {"EDITOR": "vim"},
            "onlogin": ["login.sh"]
        })
        .as_object()
        .cloned()
        .unwrap();
        let profile = Profile::from_document("p", Path::new("/p"), doc).unwrap();
        assert_eq!(profile.symlinks().unwrap().len(), 1);
        assert_eq!(profile.copies().unwrap().len(), 1);
        assert_eq!(profile.env().unwrap().len(), 1);
        assert_eq!(profile.onlogin().unwrap(), vec!["login.sh".to_string()]);
    }
}

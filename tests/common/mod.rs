// Shared helpers for integration tests.
//
// Provides a temporary home directory with a profile storage directory, an
// `Environment` that points at it, and a fluent builder so each integration
// test can set up isolated profiles without repeating filesystem
// boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use myenv::cli::GlobalOpts;
use myenv::error::ContextError;
use myenv::platform::Environment;

/// [`Environment`] whose home directory is a temporary directory.
#[derive(Debug, Clone)]
pub struct TestEnvironment {
    home: PathBuf,
    fqdn: String,
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    /// Set an ambient environment variable.
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl Environment for TestEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn home(&self) -> Result<PathBuf, ContextError> {
        Ok(self.home.clone())
    }

    fn fqdn(&self) -> Result<String, ContextError> {
        Ok(self.fqdn.clone())
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    _tmp: tempfile::TempDir,
    /// Canonical home directory.
    pub home: PathBuf,
    /// Environment pointing at [`Self::home`], host `box.example.com`.
    pub env: TestEnvironment,
}

impl IntegrationTestContext {
    /// Create an empty home directory with an empty `.myenv` storage.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let home = dunce::canonicalize(tmp.path()).expect("canonical temp dir");
        std::fs::create_dir_all(home.join(".myenv")).expect("create storage dir");
        let env = TestEnvironment {
            home: home.clone(),
            fqdn: "box.example.com".to_string(),
            vars: HashMap::new(),
        };
        Self {
            _tmp: tmp,
            home,
            env,
        }
    }

    /// Profile storage directory.
    pub fn storage(&self) -> PathBuf {
        self.home.join(".myenv")
    }

    /// Path of a profile directory.
    pub fn profile_dir(&self, name: &str) -> PathBuf {
        self.storage().join(name)
    }

    /// Global options without dry-run and with the default storage.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            dry_run: false,
            dir: None,
        }
    }

    /// Snapshot of every entry below `home` (excluding the storage
    /// directory): relative path mapped to a short description.
    pub fn home_tree(&self) -> BTreeMap<PathBuf, String> {
        let mut tree = BTreeMap::new();
        collect(&self.home, &self.home, &self.storage(), &mut tree);
        tree
    }
}

fn collect(root: &Path, dir: &Path, skip: &Path, tree: &mut BTreeMap<PathBuf, String>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path == skip {
            continue;
        }
        let rel = path.strip_prefix(root).expect("under root").to_path_buf();
        let meta = std::fs::symlink_metadata(&path).expect("metadata");
        if meta.file_type().is_symlink() {
            let dest = std::fs::read_link(&path).expect("read link");
            tree.insert(rel, format!("link -> {}", dest.display()));
        } else if meta.is_dir() {
            tree.insert(rel, "dir".to_string());
            collect(root, &path, skip, tree);
        } else {
            let text = std::fs::read_to_string(&path).unwrap_or_default();
            tree.insert(rel, format!("file: {text}"));
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to add profiles and home-directory files before
/// the context is finalised.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with no profiles.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Create profile `name` with the given `profile.json` contents.
    pub fn with_profile(self, name: &str, descriptor: &str) -> Self {
        let dir = self.ctx.profile_dir(name);
        std::fs::create_dir_all(&dir).expect("create profile dir");
        std::fs::write(dir.join("profile.json"), descriptor).expect("write profile.json");
        self
    }

    /// Write `content` to `file` inside profile `name`, creating parents.
    pub fn with_profile_file(self, name: &str, file: &str, content: &str) -> Self {
        let path = self.ctx.profile_dir(name).join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create profile file parent");
        }
        std::fs::write(&path, content).expect("write profile file");
        self
    }

    /// Write `content` to `file` relative to the home directory.
    pub fn with_home_file(self, file: &str, content: &str) -> Self {
        let path = self.ctx.home.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home file parent");
        }
        std::fs::write(&path, content).expect("write home file");
        self
    }

    /// Set an ambient environment variable.
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.ctx.env = self.ctx.env.with_var(name, value);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

//! Ambient context: home directory, hostname, environment variables and
//! `$VAR` / `~` path expansion.
use std::io;
use std::path::{Component, Path, PathBuf};

use dns_lookup::AddrInfoHints;

use crate::error::ContextError;

/// Separator used when joining path-list environment variables.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
/// Separator used when joining path-list environment variables.
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Read-only view of the process environment.
///
/// Selectors, path expansion and the environment merge consult this trait
/// instead of `std::env` so tests can supply a deterministic context.
pub trait Environment {
    /// Look up an environment variable.
    fn var(&self, name: &str) -> Option<String>;

    /// The user's home directory.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::HomeNotSet`] when the directory cannot be determined.
    fn home(&self) -> Result<PathBuf, ContextError>;

    /// The fully qualified domain name of this host.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Hostname`] if the hostname cannot be read.
    fn fqdn(&self) -> Result<String, ContextError>;
}

/// [`Environment`] backed by the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home(&self) -> Result<PathBuf, ContextError> {
        let home = if cfg!(target_os = "windows") {
            std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
        } else {
            std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))
        };
        let home = home.map_err(|_| ContextError::HomeNotSet)?;
        let home = home.trim();
        if home.is_empty() {
            return Err(ContextError::HomeNotSet);
        }
        Ok(PathBuf::from(home))
    }

    fn fqdn(&self) -> Result<String, ContextError> {
        fqdn_with(&SystemResolver)
    }
}

/// Host name lookups behind [`Environment::fqdn`].
pub trait HostResolver {
    /// The local host name as reported by the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the host name cannot be read.
    fn hostname(&self) -> io::Result<String>;

    /// The canonical name the resolver reports for `host`, if any.
    fn canonical_name(&self, host: &str) -> Option<String>;
}

/// [`HostResolver`] backed by `gethostname` and `getaddrinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

// Same value on Linux, the BSDs, macOS and Windows.
const AI_CANONNAME: i32 = 0x0002;

impl HostResolver for SystemResolver {
    fn hostname(&self) -> io::Result<String> {
        hostname::get().map(|h| h.to_string_lossy().into_owned())
    }

    fn canonical_name(&self, host: &str) -> Option<String> {
        let hints = AddrInfoHints {
            flags: AI_CANONNAME,
            ..AddrInfoHints::default()
        };
        dns_lookup::getaddrinfo(Some(host), None, Some(hints))
            .ok()?
            .filter_map(Result::ok)
            .find_map(|info| info.canonname)
    }
}

/// Compute the fully qualified domain name of this host.
///
/// The canonical name reported by `resolver` is used when it is a dotted
/// name; otherwise the plain host name is returned.
///
/// # Errors
///
/// Returns [`ContextError::Hostname`] if the host name cannot be read.
pub fn fqdn_with(resolver: &dyn HostResolver) -> Result<String, ContextError> {
    let host = resolver.hostname().map_err(ContextError::Hostname)?;
    let canonical = resolver
        .canonical_name(&host)
        .map(|name| name.trim_end_matches('.').to_string())
        .filter(|name| name.contains('.'));
    Ok(canonical.unwrap_or(host))
}

/// Expand `$NAME` / `${NAME}` references and a leading `~` in `raw`.
///
/// Unset variables are left in place verbatim. `~` is only expanded when it
/// is the whole string or followed by a path separator; `~user` forms are
/// left alone.
///
/// # Errors
///
/// Returns [`ContextError::HomeNotSet`] if `raw` starts with `~` and the home
/// directory cannot be resolved.
pub fn expand(raw: &str, env: &dyn Environment) -> Result<PathBuf, ContextError> {
    let vars = expand_vars(raw, env);
    if vars == "~" {
        return env.home();
    }
    if let Some(rest) = vars.strip_prefix("~/").or_else(|| {
        if cfg!(windows) {
            vars.strip_prefix("~\\")
        } else {
            None
        }
    }) {
        return Ok(env.home()?.join(rest));
    }
    Ok(PathBuf::from(vars))
}

/// Expand `path` and, if it is still relative, resolve it against `base`.
///
/// # Errors
///
/// Propagates errors from [`expand`].
pub fn resolve_against(
    raw: &str,
    base: &Path,
    env: &dyn Environment,
) -> Result<PathBuf, ContextError> {
    let expanded = expand(raw, env)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

fn expand_vars(raw: &str, env: &dyn Environment) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('$') {
        let (literal, tail) = rest.split_at(idx);
        out.push_str(literal);
        let after = tail.split_at(1).1;
        if let Some(braced) = after.strip_prefix('{')
            && let Some(end) = braced.find('}')
        {
            let (name, remainder) = braced.split_at(end);
            push_var(&mut out, env, name, true);
            rest = remainder.split_at(1).1;
            continue;
        }
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let (name, remainder) = after.split_at(len);
        push_var(&mut out, env, name, false);
        rest = remainder;
    }
    out.push_str(rest);
    out
}

fn push_var(out: &mut String, env: &dyn Environment, name: &str, braced: bool) {
    match env.var(name) {
        Some(value) if !name.is_empty() => out.push_str(&value),
        _ if braced => {
            out.push_str("${");
            out.push_str(name);
            out.push('}');
        }
        _ => {
            out.push('$');
            out.push_str(name);
        }
    }
}

/// Resolve `path` to an absolute, symlink-free form where possible.
///
/// Existing paths are canonicalised; for paths that do not exist yet the
/// longest existing ancestor is canonicalised and the remaining components
/// are appended after lexical `.` / `..` normalisation.
#[must_use]
pub fn real_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = dunce::canonicalize(path) {
        return resolved;
    }
    let normal = normalize(path);
    if let Ok(resolved) = dunce::canonicalize(&normal) {
        return resolved;
    }
    let mut existing = normal.as_path();
    let mut tail = Vec::new();
    while let Some(parent) = existing.parent() {
        if let Some(name) = existing.file_name() {
            tail.push(name.to_os_string());
        }
        existing = parent;
        if let Ok(resolved) = dunce::canonicalize(existing) {
            return tail.iter().rev().fold(resolved, |acc, c| acc.join(c));
        }
    }
    normal
}

/// Lexically normalise `path`, removing `.` components and folding `..`.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

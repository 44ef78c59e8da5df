//! Utility functions for path resolution, ANSI stripping, and time formatting.
use std::path::PathBuf;

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range), so cursor movement, erase, etc.
/// are also stripped without consuming unrelated text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve the myenv cache directory from the given `XDG_CACHE_HOME` and
/// home directory values.
///
/// Falls back to `<home>/.cache`, then to the current directory.
fn cache_dir_from(xdg_cache_home: Option<String>, home: Option<String>) -> PathBuf {
    let cache_dir = xdg_cache_home
        .filter(|v| !v.is_empty())
        .map_or_else(
            || {
                home.map_or_else(|| PathBuf::from("."), PathBuf::from)
                    .join(".cache")
            },
            PathBuf::from,
        );
    cache_dir.join("myenv")
}

/// Return the `$XDG_CACHE_HOME/myenv/` directory.
///
/// The directory is not created; [`FileLayer`](super::subscriber::FileLayer)
/// creates it when the log file is opened.
pub(super) fn cache_dir() -> PathBuf {
    cache_dir_from(
        std::env::var("XDG_CACHE_HOME").ok(),
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok(),
    )
}

/// Return the log file path under `$XDG_CACHE_HOME/myenv/` (or `~/.cache/myenv/`).
pub(super) fn log_file_path(command: &str) -> PathBuf {
    cache_dir().join(format!("{command}.log"))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

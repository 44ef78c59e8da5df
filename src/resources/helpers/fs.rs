//! File-system helpers shared by the symlink and copy resources.
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

/// What currently occupies a path, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing exists at the path.
    Missing,
    /// A symbolic link (possibly dangling).
    Symlink,
    /// A real directory.
    Directory,
    /// A regular file.
    File,
    /// A socket, fifo, device or similar.
    Other,
}

impl EntryKind {
    /// Inspect `path` with `symlink_metadata`.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        match fs::symlink_metadata(path) {
            Err(_) => Self::Missing,
            Ok(meta) if meta.file_type().is_symlink() => Self::Symlink,
            Ok(meta) if meta.is_dir() => Self::Directory,
            Ok(meta) if meta.is_file() => Self::File,
            Ok(_) => Self::Other,
        }
    }
}

/// Create the immediate parent directory of `path` if it is missing.
///
/// Only one level is created; a missing grandparent is an error.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir(parent)
        }
        _ => Ok(()),
    }
}

/// Remove whatever occupies `path`: links are unlinked without following
/// them, directories are removed recursively, files are deleted.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the entry exists but cannot be removed.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    match EntryKind::of(path) {
        EntryKind::Missing => Ok(()),
        EntryKind::Symlink => remove_symlink(path),
        EntryKind::Directory => fs::remove_dir_all(path),
        EntryKind::File | EntryKind::Other => fs::remove_file(path),
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`.
fn remove_symlink(path: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        let meta = fs::symlink_metadata(path)?;
        if meta.file_attributes() & 0x10 != 0 {
            return fs::remove_dir(path);
        }
    }
    fs::remove_file(path)
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }
    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Returns `true` if `link` is a symlink whose stored target is `target`.
#[must_use]
pub fn links_to(link: &Path, target: &Path) -> bool {
    fs::read_link(link).is_ok_and(|existing| existing == target)
}

/// Copy a regular file, preserving permissions and access/modification
/// times.
///
/// # Errors
///
/// Returns an error if the file cannot be copied.
pub fn copy_file_preserving(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    let meta = fs::metadata(src)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    #[cfg(unix)]
    let file = File::open(dst)?;
    #[cfg(not(unix))]
    let file = File::options().write(true).open(dst)?;
    file.set_times(times)
}

/// Recursively copy a directory tree to `dst`, which must not exist yet.
///
/// Symlinks inside the tree are recreated as links with the same stored
/// target rather than followed. Regular files keep their permissions and
/// timestamps.
///
/// # Errors
///
/// Returns an error if the destination cannot be created or any entry fails
/// to copy. Sockets, fifos and devices inside the tree are reported as
/// [`io::ErrorKind::Unsupported`] instead of being read.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            create_symlink(&fs::read_link(&src_path)?, &dst_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            copy_file_preserving(&src_path, &dst_path)?;
        } else {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported file type: {}", src_path.display()),
            ));
        }
    }
    fs::set_permissions(dst, fs::metadata(src)?.permissions())
}

/// Create a named pipe at `path`.
#[cfg(all(test, unix))]
#[allow(clippy::expect_used)]
pub fn make_fifo(path: &Path) {
    let status = std::process::Command::new("mkfifo")
        .arg(path)
        .status()
        .expect("run mkfifo");
    assert!(status.success(), "mkfifo {} failed", path.display());
}

//! Path utilities for comparing copy endpoints and for cross-platform
//! compatibility.
//!
//! [`resolve`] produces the form used to decide whether two paths refer to
//! the same location. [`safe_path`] handles Windows long-path support.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute, comparable location.
///
/// The path is made absolute against the current directory, `.` and `..`
/// are removed lexically, and symlinks in the longest existing ancestor of
/// the parent directory are resolved. The final component is kept as-is so
/// that a symlink is identified by its own location, not its target.
///
/// A path spelled with a trailing separator or a trailing `.` names the
/// directory the final component leads to, and the filesystem follows a
/// final symlink for such a path. When it exists it is therefore fully
/// canonicalized, matching what `symlink_metadata` reports for it.
///
/// Works for paths that do not exist yet.
pub(crate) fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if names_directory_contents(path) {
        if let Ok(canonical) = std::fs::canonicalize(&absolute) {
            return Ok(canonical);
        }
    }

    let normalized = normalize_lexically(&absolute);

    match (normalized.parent(), normalized.file_name()) {
        (Some(parent), Some(name)) => Ok(canonicalize_existing_prefix(parent)?.join(name)),
        _ => Ok(normalized),
    }
}

/// Whether `path` ends in a separator, in `/.`, or is exactly `.`.
///
/// `Path::components` drops both spellings, so this looks at the raw bytes.
fn names_directory_contents(path: &Path) -> bool {
    let is_separator = |byte: u8| std::path::is_separator(char::from(byte));
    match path.as_os_str().as_encoded_bytes() {
        [b'.'] => true,
        [.., sep, b'.'] => is_separator(*sep),
        [.., last] => is_separator(*last),
        [] => false,
    }
}

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component);
            }
        }
    }
    out
}

/// Canonicalize the longest existing ancestor of `path` and append the
/// remaining (non-existent) components unchanged.
fn canonicalize_existing_prefix(path: &Path) -> io::Result<PathBuf> {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        match std::fs::canonicalize(current) {
            Ok(mut canonical) => {
                for name in missing.iter().rev() {
                    canonical.push(name);
                }
                return Ok(canonical);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => match current.parent() {
                Some(parent) => {
                    if let Some(name) = current.file_name() {
                        missing.push(name.to_os_string());
                    }
                    current = parent;
                }
                None => return Ok(path.to_path_buf()),
            },
            Err(e) => return Err(e),
        }
    }
}

/// Whether `path` lies strictly below `ancestor`, comparing whole components.
pub(crate) fn is_strict_descendant(path: &Path, ancestor: &Path) -> bool {
    path != ancestor && path.starts_with(ancestor)
}

/// Convert a path to an extended-length path format on Windows.
///
/// On Windows, the default maximum path length is 260 characters (MAX_PATH).
/// By using the extended-length path syntax (prefixing with `\\?\`), paths
/// can be up to 32,767 characters.
///
/// - Absolute paths like `C:\path` become `\\?\C:\path`
/// - UNC paths like `\\server\share\path` become `\\?\UNC\server\share\path`
/// - Relative paths are first converted to absolute, then prefixed
#[cfg(windows)]
pub(crate) fn safe_path(path: &Path) -> PathBuf {
    let path_str = path.as_os_str().to_string_lossy();
    if path_str.starts_with(r"\\?\") {
        return path.to_path_buf();
    }

    if let Some(without_prefix) = path_str.strip_prefix(r"\\") {
        return PathBuf::from(format!(r"\\?\UNC\{}", without_prefix));
    }

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    // Extended-length paths are not normalized by the OS
    let absolute_path = normalize_lexically(&absolute_path);
    PathBuf::from(format!(r"\\?\{}", absolute_path.display()))
}

/// Convert a path for safe use with file operations.
///
/// On non-Windows platforms, this simply returns a clone of the input path.
#[cfg(not(windows))]
pub(crate) fn safe_path(path: &Path) -> PathBuf {
    path.to_path_buf()
}

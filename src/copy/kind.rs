//! Entry classification.

use std::fs::FileType;
use std::io;
use std::path::Path;

use super::backend::FsBackend;

/// Kind of a filesystem entry, as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    /// Regular file. Special files (fifos, sockets, devices) are classified
    /// as files too.
    File,
    /// Directory
    Directory,
    /// Symbolic link, whatever it points at (or if it dangles)
    Symlink,
}

impl EntryKind {
    /// Classify a file type obtained from `symlink_metadata`.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    /// Whether this is [`EntryKind::Directory`].
    pub fn is_dir(self) -> bool {
        self == Self::Directory
    }

    pub(crate) fn directory_label(self) -> &'static str {
        if self.is_dir() {
            "directory"
        } else {
            "non-directory"
        }
    }
}

/// Classify `path` without dereferencing it.
///
/// Returns an error of kind [`io::ErrorKind::NotFound`] if nothing exists at
/// the path, not even a dangling link. Other failures pass through.
pub(crate) async fn classify(fs: &dyn FsBackend, path: &Path) -> io::Result<EntryKind> {
    let meta = fs.symlink_metadata(path).await?;
    Ok(EntryKind::from_file_type(meta.file_type()))
}

/// Classify `path`, mapping "does not exist" to `None`.
pub(crate) async fn classify_existing(
    fs: &dyn FsBackend,
    path: &Path,
) -> io::Result<Option<EntryKind>> {
    match classify(fs, path).await {
        Ok(kind) => Ok(Some(kind)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

//! Error types for treecopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during copy operations, the [`Result`] type alias, and a
//! stable [`ErrorCode`] for machine-readable reporting.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Validation | [`Error::SamePath`], [`Error::DestinationIsSubdirectoryOfSource`], [`Error::SourceNotFound`] |
//! | Conflict | [`Error::AlreadyExists`], [`Error::TypeMismatch`] |
//! | IO | [`Error::Io`], [`Error::TempFile`], [`Error::Persist`] |
//!
//! Validation and conflict errors are raised before anything at the
//! destination is modified. IO errors abort the copy where they happen and
//! carry the path of the failing entry.

use crate::copy::EntryKind;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for treecopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// This helper function detects storage-full conditions across platforms.
///
/// # Platform Support
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` (errno 28) |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use treecopy::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// if is_no_space_error(&error) {
///     println!("Destination has no space!");
/// }
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    // The raw OS error might be available even if kind() isn't StorageFull
    #[cfg(unix)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ENOSPC: i32 = 28;
            return raw_error == ENOSPC;
        }
    }

    #[cfg(windows)]
    {
        if let Some(raw_error) = error.raw_os_error() {
            const ERROR_DISK_FULL: i32 = 112;
            return raw_error == ERROR_DISK_FULL;
        }
    }

    false
}

/// Errors that can occur during copy operations.
///
/// The `Display` wording of the validation and conflict variants is stable;
/// callers surface it to users as-is.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Source and destination resolve to the same location
    #[error("Source and destination cannot be the same.")]
    SamePath,

    /// Destination lies inside the source tree
    #[error("Cannot copy '{}' to a subdirectory of itself, '{}'.", .src.display(), .dst.display())]
    DestinationIsSubdirectoryOfSource {
        /// Source path as given by the caller
        src: PathBuf,
        /// Destination path as given by the caller
        dst: PathBuf,
    },

    /// Source path does not exist
    #[error("Source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Destination already exists and overwriting is disabled
    #[error("'{}' already exists.", .0.display())]
    AlreadyExists(PathBuf),

    /// Destination exists as a directory and the source is not one, or the
    /// other way around
    #[error(
        "Cannot overwrite {} '{}' with {} '{}'.",
        .existing.directory_label(),
        .dst.display(),
        .incoming.directory_label(),
        .src.display()
    )]
    TypeMismatch {
        /// Source entry
        src: PathBuf,
        /// Existing destination entry
        dst: PathBuf,
        /// Kind of the entry already at the destination
        existing: EntryKind,
        /// Kind of the source entry
        incoming: EntryKind,
    },

    /// IO error while operating on a specific entry
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// The entry the operation failed on
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create temporary file
    #[error("Failed to create temporary file in {}: {source}", .path.display())]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to persist temporary file
    #[error("Failed to persist temporary file to {}: {source}", .path.display())]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SamePath => ErrorCode::SamePath,
            Self::DestinationIsSubdirectoryOfSource { .. } => ErrorCode::SubdirectoryOfSource,
            Self::SourceNotFound(_) => ErrorCode::SourceNotFound,
            Self::AlreadyExists(_) => ErrorCode::AlreadyExists,
            Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::Io { source, .. } | Self::TempFile { source, .. } | Self::Persist { source, .. } => {
                ErrorCode::from_io(source)
            }
        }
    }

    /// The path the error is about, if it names one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SamePath => None,
            Self::DestinationIsSubdirectoryOfSource { dst, .. } | Self::TypeMismatch { dst, .. } => {
                Some(dst)
            }
            Self::SourceNotFound(path) | Self::AlreadyExists(path) => Some(path),
            Self::Io { path, .. } | Self::TempFile { path, .. } | Self::Persist { path, .. } => {
                Some(path)
            }
        }
    }
}

/// Machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// [`Error::SamePath`]
    SamePath,
    /// [`Error::DestinationIsSubdirectoryOfSource`]
    SubdirectoryOfSource,
    /// [`Error::SourceNotFound`]
    SourceNotFound,
    /// [`Error::AlreadyExists`]
    AlreadyExists,
    /// [`Error::TypeMismatch`]
    TypeMismatch,
    /// IO failure caused by missing permissions
    PermissionDenied,
    /// IO failure caused by a full destination
    NoSpace,
    /// Any other IO failure
    IoError,
}

impl ErrorCode {
    fn from_io(error: &io::Error) -> Self {
        if is_no_space_error(error) {
            Self::NoSpace
        } else if error.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied
        } else {
            Self::IoError
        }
    }

    /// Snake-case name used in structured output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SamePath => "same_path",
            Self::SubdirectoryOfSource => "subdirectory_of_source",
            Self::SourceNotFound => "source_not_found",
            Self::AlreadyExists => "already_exists",
            Self::TypeMismatch => "type_mismatch",
            Self::PermissionDenied => "permission_denied",
            Self::NoSpace => "no_space",
            Self::IoError => "io_error",
        }
    }

    /// Whether the error comes from the arguments rather than the filesystem.
    pub fn is_invalid_input(self) -> bool {
        matches!(self, Self::SamePath | Self::SubdirectoryOfSource)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

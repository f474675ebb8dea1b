//! Utility functions for copy operations.
//!
//! This module contains the content-copy loop, symlink creation shim,
//! timestamp extraction and small path helpers shared by the backends and
//! replicators.

use filetime::FileTime;
use std::fs::Metadata;
use std::io::{self, BufReader};
use std::path::Path;

// =============================================================================
// File content copying
// =============================================================================

/// Efficiently copy file contents using the best available method.
///
/// Copies from the current position of `src` to end of file. The size
/// reported by `stat` is not trusted: pseudo files report 0 and a file may
/// grow while it is being copied.
///
/// On Linux 4.5+, uses `copy_file_range` for zero-copy kernel-to-kernel transfer.
/// Falls back to `std::io::copy` on other platforms or on error.
pub(crate) fn copy_file_contents(src: &std::fs::File, dst: &std::fs::File) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        copy_file_range_all(src, dst)
    }
    #[cfg(not(target_os = "linux"))]
    {
        io::copy(&mut BufReader::new(src), &mut &*dst)
    }
}

/// Linux-specific: copy using copy_file_range(2) syscall.
///
/// Falls back to io::copy if copy_file_range fails before any byte was
/// transferred (e.g., cross-filesystem).
#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &std::fs::File, dst: &std::fs::File) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    const CHUNK_SIZE: usize = 128 * 1024 * 1024;

    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();
    let mut copied: u64 = 0;

    loop {
        // SAFETY: both descriptors are open for the duration of the call and
        // null offsets make the kernel use (and advance) the file positions.
        let result = unsafe {
            libc::copy_file_range(
                src_fd,
                std::ptr::null_mut(),
                dst_fd,
                std::ptr::null_mut(),
                CHUNK_SIZE,
                0,
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV)
                        | Some(libc::ENOSYS)
                        | Some(libc::EINVAL)
                        | Some(libc::EOPNOTSUPP)
                )
            {
                return io::copy(&mut BufReader::new(src), &mut &*dst);
            }
            return Err(err);
        }

        if result == 0 {
            break;
        }

        copied += result as u64;
    }

    // procfs and sysfs answer 0 without being at EOF; drain the rest from
    // the current offset
    copied += io::copy(&mut BufReader::new(src), &mut &*dst)?;

    Ok(copied)
}

// =============================================================================
// Symlink utilities
// =============================================================================

#[cfg(unix)]
pub(crate) use std::os::unix::fs::symlink;

#[cfg(not(unix))]
pub(crate) fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(symlinks_unsupported())
}

#[cfg(not(unix))]
pub(crate) fn symlinks_unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "Symlinks not supported on this platform",
    )
}

// =============================================================================
// Metadata and timestamp utilities
// =============================================================================

/// Access and modification times recorded in `meta`, as `(atime, mtime)`.
#[inline]
pub(crate) fn file_times(meta: &Metadata) -> (FileTime, FileTime) {
    (
        FileTime::from_last_access_time(meta),
        FileTime::from_last_modification_time(meta),
    )
}

// =============================================================================
// Path helpers
// =============================================================================

/// Directory a temporary file for `dst` should be created in.
///
/// A bare file name has an empty parent, which means the current directory.
pub(crate) fn parent_dir(dst: &Path) -> &Path {
    match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

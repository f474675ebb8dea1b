//! Filesystem primitives the copy algorithm is written against.
//!
//! The algorithm in this crate is written once, as async code over
//! [`FsBackend`]. Two implementations exist:
//!
//! - [`StdFs`] calls `std::fs` directly. Its futures complete on first poll,
//!   so the blocking entry points drive them with
//!   [`futures::executor::block_on`] and never need a runtime.
//! - [`TokioFs`] uses `tokio::fs` and `tokio::io`, yielding to the scheduler
//!   at every IO step. Calls into `tempfile` and `filetime` are moved to the
//!   blocking pool.

use crate::error::{Error, Result};
use crate::utils::path::{resolve, safe_path};
use async_trait::async_trait;
use filetime::FileTime;
use std::ffi::OsString;
use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::utils::{copy_file_contents, parent_dir, symlink};

/// IO capability used by the copy algorithm.
///
/// Every method maps to one primitive filesystem operation. Paths are passed
/// exactly as the algorithm computed them; implementations apply
/// [`safe_path`] where the OS needs it.
#[async_trait]
pub(crate) trait FsBackend: Send + Sync {
    /// Absolute, comparable form of `path`, see [`resolve`].
    async fn resolve(&self, path: &Path) -> io::Result<PathBuf>;

    /// Metadata without following a final symlink (lstat).
    async fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Raw target of a symlink.
    async fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Create `link` pointing at `target`.
    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Create a directory and any missing parents.
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Names of the direct entries of a directory, sorted lexically.
    async fn read_dir_sorted(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Remove a file or symlink.
    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Copy the bytes and permission bits of `src` to `dst`, replacing `dst`.
    ///
    /// The source is opened before anything happens at the destination. Data
    /// goes to a temporary file next to `dst` that is renamed over it, so
    /// `dst` is never left truncated or half written.
    async fn copy_contents(&self, src: &Path, dst: &Path, fsync: bool) -> Result<u64>;

    /// Set access and modification times, following symlinks.
    async fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()>;

    /// Set access and modification times of a symlink itself.
    async fn set_symlink_times(
        &self,
        path: &Path,
        atime: FileTime,
        mtime: FileTime,
    ) -> io::Result<()>;
}

// =============================================================================
// Blocking backend
// =============================================================================

/// [`FsBackend`] over `std::fs`. Never suspends.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StdFs;

#[async_trait]
impl FsBackend for StdFs {
    async fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        resolve(path)
    }

    async fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::symlink_metadata(safe_path(path))
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(safe_path(path))
    }

    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        // The target is stored verbatim; only the link location is converted
        symlink(target, &safe_path(link))
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(safe_path(path))
    }

    async fn read_dir_sorted(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = fs::read_dir(safe_path(path))?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(safe_path(path))
    }

    async fn copy_contents(&self, src: &Path, dst: &Path, fsync: bool) -> Result<u64> {
        let src_file = File::open(safe_path(src)).map_err(|e| Error::io(src, e))?;
        let src_meta = src_file.metadata().map_err(|e| Error::io(src, e))?;

        let dst_parent = parent_dir(dst);
        let temp_file =
            NamedTempFile::new_in(safe_path(dst_parent)).map_err(|e| Error::TempFile {
                path: dst_parent.to_path_buf(),
                source: e,
            })?;

        let bytes_copied = copy_file_contents(&src_file, temp_file.as_file())
            .map_err(|e| Error::io(dst, e))?;

        if fsync {
            temp_file.as_file().sync_all().map_err(|e| Error::io(dst, e))?;
        }

        fs::set_permissions(temp_file.path(), src_meta.permissions())
            .map_err(|e| Error::io(dst, e))?;

        // Rename over any existing entry; the policy has already authorized it
        temp_file
            .persist(safe_path(dst))
            .map_err(|e| Error::Persist {
                path: dst.to_path_buf(),
                source: e.error,
            })?;

        Ok(bytes_copied)
    }

    async fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()> {
        filetime::set_file_times(safe_path(path), atime, mtime)
    }

    async fn set_symlink_times(
        &self,
        path: &Path,
        atime: FileTime,
        mtime: FileTime,
    ) -> io::Result<()> {
        filetime::set_symlink_file_times(safe_path(path), atime, mtime)
    }
}

// =============================================================================
// Suspending backend
// =============================================================================

/// [`FsBackend`] over `tokio::fs`. Must be used inside a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TokioFs;

/// Run a blocking closure on Tokio's blocking pool.
async fn blocking<T, F>(f: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(io::Error::other)?
}

#[async_trait]
impl FsBackend for TokioFs {
    async fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        let path = path.to_path_buf();
        blocking(move || resolve(&path)).await
    }

    async fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        tokio::fs::symlink_metadata(safe_path(path)).await
    }

    async fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::read_link(safe_path(path)).await
    }

    #[cfg(unix)]
    async fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        tokio::fs::symlink(target, safe_path(link)).await
    }

    #[cfg(not(unix))]
    async fn symlink(&self, _target: &Path, _link: &Path) -> io::Result<()> {
        Err(super::utils::symlinks_unsupported())
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(safe_path(path)).await
    }

    async fn read_dir_sorted(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut entries = tokio::fs::read_dir(safe_path(path)).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name());
        }
        names.sort();
        Ok(names)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(safe_path(path)).await
    }

    async fn copy_contents(&self, src: &Path, dst: &Path, fsync: bool) -> Result<u64> {
        use tokio::io::AsyncWriteExt;

        let mut reader = tokio::fs::File::open(safe_path(src))
            .await
            .map_err(|e| Error::io(src, e))?;
        let permissions = reader
            .metadata()
            .await
            .map_err(|e| Error::io(src, e))?
            .permissions();

        let dst_parent = parent_dir(dst).to_path_buf();
        let temp_dir = safe_path(&dst_parent);
        let temp_file = blocking(move || NamedTempFile::new_in(temp_dir))
            .await
            .map_err(|e| Error::TempFile {
                path: dst_parent,
                source: e,
            })?;

        // The temp path deletes the file when dropped on an error path
        let (file, temp_path) = temp_file.into_parts();
        let mut writer = tokio::fs::File::from_std(file);

        let bytes_copied = tokio::io::copy(&mut reader, &mut writer)
            .await
            .map_err(|e| Error::io(dst, e))?;
        writer.flush().await.map_err(|e| Error::io(dst, e))?;

        if fsync {
            writer.sync_all().await.map_err(|e| Error::io(dst, e))?;
        }

        writer
            .set_permissions(permissions)
            .await
            .map_err(|e| Error::io(dst, e))?;
        drop(writer);

        let target = safe_path(dst);
        blocking(move || temp_path.persist(target).map_err(|e| e.error))
            .await
            .map_err(|e| Error::Persist {
                path: dst.to_path_buf(),
                source: e,
            })?;

        Ok(bytes_copied)
    }

    async fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()> {
        let path = safe_path(path);
        blocking(move || filetime::set_file_times(path, atime, mtime)).await
    }

    async fn set_symlink_times(
        &self,
        path: &Path,
        atime: FileTime,
        mtime: FileTime,
    ) -> io::Result<()> {
        let path = safe_path(path);
        blocking(move || filetime::set_symlink_file_times(path, atime, mtime)).await
    }
}

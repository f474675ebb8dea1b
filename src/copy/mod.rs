//! Core copy operations.
//!
//! [`copy`] and [`copy_sync`] are the entry points. Both run the same
//! sequential algorithm:
//!
//! 1. Reject self-copies and copies into the source's own subtree.
//! 2. Classify the source without following symlinks.
//! 3. Dispatch on [`EntryKind`]: symlinks and files go through the overwrite
//!    policy and their replicator, directories through the tree walker,
//!    which sends every child back through step 2.
//!
//! The blocking form runs it over `std::fs`, the async form over
//! `tokio::fs`.
//!
//! # Known limitations
//!
//! - Existence checks and the writes that follow are separate steps. A
//!   concurrent writer can create or remove a destination entry in between.
//! - Nothing is rolled back. A failure (or dropping the future returned by
//!   [`copy`]) leaves whatever was already copied in place.

mod backend;
mod dir;
mod file;
mod kind;
mod policy;
mod symlink;
mod utils;
mod validate;

pub use kind::EntryKind;

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use futures::future::BoxFuture;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use backend::{FsBackend, StdFs, TokioFs};
use policy::check_destination;

/// Statistics from a copy operation.
///
/// Returned by [`copy`] and [`copy_sync`] to report what was done.
///
/// # Example
///
/// ```no_run
/// use treecopy::{copy_sync, CopyOptions};
/// use std::path::Path;
///
/// let stats = copy_sync(Path::new("src"), Path::new("dst"), &CopyOptions::default())?;
/// println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
/// # Ok::<(), treecopy::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Number of regular files copied
    pub files_copied: u64,
    /// Number of symlinks recreated
    pub symlinks_copied: u64,
    /// Number of directories of the copied tree that were created. Missing
    /// parents of the destination are created as needed but not counted.
    pub dirs_created: u64,
    /// Number of destination entries that already existed: files and
    /// symlinks replaced, directories merged into
    pub entries_replaced: u64,
    /// Total bytes of file content copied
    pub bytes_copied: u64,
    /// Duration of the copy operation
    pub duration: Duration,
}

/// Copy a file, directory or symlink, suspending on IO.
///
/// Must be awaited inside a Tokio runtime. The observable behavior is the
/// same as [`copy_sync`].
///
/// # Example
///
/// ```no_run
/// use treecopy::{copy, CopyOptions};
/// use std::path::Path;
///
/// # async fn run() -> treecopy::Result<()> {
/// let options = CopyOptions::default().with_overwrite();
/// copy(Path::new("assets"), Path::new("public/assets"), &options).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`copy_sync`].
pub async fn copy(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    run(&TokioFs, src, dst, options).await
}

/// Copy a file, directory or symlink, blocking the current thread.
///
/// - A symlink is recreated with the same raw target; what it points at is
///   never copied.
/// - A file's bytes are copied (and its times, with `preserve_timestamps`).
/// - A directory is created (or, with `overwrite`, merged into) and each
///   child copied in name order. Unrelated destination entries are kept.
///
/// # Errors
///
/// Returns an error if:
/// - `src` and `dst` are the same location ([`Error::SamePath`])
/// - `dst` is inside `src` ([`Error::DestinationIsSubdirectoryOfSource`])
/// - `src` does not exist ([`Error::SourceNotFound`])
/// - A destination entry exists and `overwrite` is off ([`Error::AlreadyExists`])
/// - A directory would replace a non-directory or vice versa ([`Error::TypeMismatch`])
/// - IO operations fail ([`Error::Io`], [`Error::TempFile`], [`Error::Persist`])
///
/// The first error stops the copy; nothing already copied is removed.
pub fn copy_sync(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    futures::executor::block_on(run(&StdFs, src, dst, options))
}

async fn run(
    fs: &dyn FsBackend,
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
) -> Result<CopyStats> {
    let start_time = Instant::now();

    validate::validate(fs, src, dst).await?;

    let mut stats = CopyStats::default();
    copy_entry(fs, src, dst, options, &mut stats).await?;
    stats.duration = start_time.elapsed();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        files = stats.files_copied,
        symlinks = stats.symlinks_copied,
        dirs = stats.dirs_created,
        bytes = stats.bytes_copied,
        "copy finished"
    );

    Ok(stats)
}

/// Classify `src` and dispatch it to its replicator.
///
/// Boxed because directories recurse back into it.
fn copy_entry<'a>(
    fs: &'a dyn FsBackend,
    src: &'a Path,
    dst: &'a Path,
    options: &'a CopyOptions,
    stats: &'a mut CopyStats,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let kind = match kind::classify(fs, src).await {
            Ok(kind) => kind,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::SourceNotFound(src.to_path_buf()));
            }
            Err(e) => return Err(Error::io(src, e)),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(src = %src.display(), dst = %dst.display(), ?kind, "dispatching entry");

        match kind {
            EntryKind::Symlink => {
                let action = check_destination(fs, src, dst, kind, options).await?;
                symlink::copy_link(fs, src, dst, action, options, stats).await
            }
            EntryKind::File => {
                let action = check_destination(fs, src, dst, kind, options).await?;
                file::copy_file(fs, src, dst, action, options, stats).await
            }
            EntryKind::Directory => dir::copy_dir(fs, src, dst, options, stats).await,
        }
    })
}

// =============================================================================
// Tests
// =============================================================================

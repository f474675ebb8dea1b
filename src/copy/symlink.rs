//! Symlink replication.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::path::Path;

use super::CopyStats;
use super::backend::FsBackend;
use super::policy::Action;
use super::utils::file_times;

/// Recreate the symlink `src` at `dst` with the same raw target.
///
/// The target is never resolved or inspected, so relative targets stay
/// relative and dangling links stay dangling. With
/// [`Action::ProceedReplace`] the existing (non-directory) entry at `dst` is
/// removed first.
pub(crate) async fn copy_link(
    fs: &dyn FsBackend,
    src: &Path,
    dst: &Path,
    action: Action,
    options: &CopyOptions,
    stats: &mut CopyStats,
) -> Result<()> {
    let target = fs.read_link(src).await.map_err(|e| Error::io(src, e))?;

    if action == Action::ProceedReplace {
        fs.remove_file(dst).await.map_err(|e| Error::io(dst, e))?;
    }

    fs.symlink(&target, dst)
        .await
        .map_err(|e| Error::io(dst, e))?;

    if options.preserve_timestamps {
        let src_meta = fs
            .symlink_metadata(src)
            .await
            .map_err(|e| Error::io(src, e))?;
        let (atime, mtime) = file_times(&src_meta);
        fs.set_symlink_times(dst, atime, mtime)
            .await
            .map_err(|e| Error::io(dst, e))?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        target = %target.display(),
        "copied symlink"
    );

    stats.symlinks_copied += 1;
    if action == Action::ProceedReplace {
        stats.entries_replaced += 1;
    }
    Ok(())
}

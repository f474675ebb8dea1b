//! Directory copy operations.
//!
//! A directory is copied by creating (or reusing) the destination directory
//! and then sending every direct child back through the orchestrator, one
//! at a time in lexical name order. Files, symlinks and nested directories
//! therefore all go through the same validation-free dispatch and overwrite
//! policy as a top-level copy.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::path::Path;

use super::backend::FsBackend;
use super::kind::EntryKind;
use super::policy::{Action, check_destination};
use super::utils::file_times;
use super::{CopyStats, copy_entry};

/// Copy the directory `src` to `dst` recursively.
///
/// # Strategy
///
/// 1. Apply the overwrite policy to `dst` itself. A fresh destination is
///    created with any missing parents; an existing directory is reused and
///    its unrelated children are left alone.
/// 2. List the children of `src`, sorted by name.
/// 3. Copy each child to the same name under `dst`. The first failure stops
///    the loop and is returned; what was copied so far stays in place.
/// 4. With `preserve_timestamps`, apply the source directory's times last,
///    after the children stopped modifying `dst`.
pub(crate) async fn copy_dir(
    fs: &dyn FsBackend,
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    stats: &mut CopyStats,
) -> Result<()> {
    let action = check_destination(fs, src, dst, EntryKind::Directory, options).await?;

    match action {
        Action::ProceedFresh => {
            fs.create_dir_all(dst)
                .await
                .map_err(|e| Error::io(dst, e))?;
            // Missing parents of a top-level destination are not counted
            stats.dirs_created += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(dst = %dst.display(), "created directory");
        }
        Action::ProceedReplace => {
            stats.entries_replaced += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(dst = %dst.display(), "merging into existing directory");
        }
    }

    let names = fs
        .read_dir_sorted(src)
        .await
        .map_err(|e| Error::io(src, e))?;

    for name in &names {
        copy_entry(fs, &src.join(name), &dst.join(name), options, stats).await?;
    }

    if options.preserve_timestamps {
        let src_meta = fs
            .symlink_metadata(src)
            .await
            .map_err(|e| Error::io(src, e))?;
        let (atime, mtime) = file_times(&src_meta);
        fs.set_times(dst, atime, mtime)
            .await
            .map_err(|e| Error::io(dst, e))?;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

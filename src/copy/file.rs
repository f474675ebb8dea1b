//! Single file copy.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::path::Path;

use super::CopyStats;
use super::backend::FsBackend;
use super::policy::Action;
use super::utils::file_times;

/// Copy the content of the regular file `src` to `dst`.
///
/// `action` is the overwrite policy's verdict for `dst`; an existing file is
/// replaced unconditionally. The source is opened before the destination is
/// touched and the new content is renamed into place, so a failure leaves
/// any previous destination content intact.
///
/// With `preserve_timestamps`, the source's atime and mtime are read after
/// the content copy and applied to `dst` together.
pub(crate) async fn copy_file(
    fs: &dyn FsBackend,
    src: &Path,
    dst: &Path,
    action: Action,
    options: &CopyOptions,
    stats: &mut CopyStats,
) -> Result<()> {
    let bytes = fs.copy_contents(src, dst, options.fsync).await?;

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

    #[cfg(feature = "tracing")]
    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        bytes,
        replaced = action == Action::ProceedReplace,
        "copied file"
    );

    stats.files_copied += 1;
    stats.bytes_copied += bytes;
    if action == Action::ProceedReplace {
        stats.entries_replaced += 1;
    }
    Ok(())
}

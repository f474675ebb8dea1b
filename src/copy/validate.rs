//! Rejection of self-referential copies.

use crate::error::{Error, Result};
use crate::utils::path::is_strict_descendant;
use std::path::Path;

use super::backend::FsBackend;

/// Check that copying `src` to `dst` does not target the source itself or a
/// location inside it.
///
/// Both paths go through [`FsBackend::resolve`], so `.`/`..` segments and symlinked
/// parent directories cannot be used to slip past the check. Nothing at
/// either path needs to exist.
///
/// # Errors
///
/// - [`Error::SamePath`] if both resolve to the same location
/// - [`Error::DestinationIsSubdirectoryOfSource`] if `dst` resolves to a
///   location under `src`
/// - [`Error::Io`] if the current directory or an existing ancestor cannot
///   be resolved
pub(crate) async fn validate(fs: &dyn FsBackend, src: &Path, dst: &Path) -> Result<()> {
    let src_resolved = fs.resolve(src).await.map_err(|e| Error::io(src, e))?;
    let dst_resolved = fs.resolve(dst).await.map_err(|e| Error::io(dst, e))?;

    if src_resolved == dst_resolved {
        return Err(Error::SamePath);
    }

    if is_strict_descendant(&dst_resolved, &src_resolved) {
        return Err(Error::DestinationIsSubdirectoryOfSource {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }

    Ok(())
}

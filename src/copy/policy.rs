//! Overwrite policy for destination entries.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::path::Path;

use super::backend::FsBackend;
use super::kind::{EntryKind, classify_existing};

/// What the replicators should do at a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Nothing exists at the destination
    ProceedFresh,
    /// A compatible entry exists and may be replaced
    ProceedReplace,
}

/// Decide whether `dst` may receive an entry of kind `src_kind`.
///
/// Directory-ness must match before anything else is considered: a
/// directory never replaces a non-directory and vice versa, even with
/// `overwrite`. Then an existing entry requires `overwrite`.
///
/// The answer describes the filesystem at the time of the check. Another
/// process may change `dst` before the caller acts on it.
///
/// # Errors
///
/// - [`Error::TypeMismatch`] if exactly one side is a directory
/// - [`Error::AlreadyExists`] if `dst` exists and `overwrite` is off
/// - [`Error::Io`] if `dst` cannot be inspected
pub(crate) async fn check_destination(
    fs: &dyn FsBackend,
    src: &Path,
    dst: &Path,
    src_kind: EntryKind,
    options: &CopyOptions,
) -> Result<Action> {
    let Some(existing) = classify_existing(fs, dst)
        .await
        .map_err(|e| Error::io(dst, e))?
    else {
        return Ok(Action::ProceedFresh);
    };

    if existing.is_dir() != src_kind.is_dir() {
        return Err(Error::TypeMismatch {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            existing,
            incoming: src_kind,
        });
    }

    if !options.overwrite {
        return Err(Error::AlreadyExists(dst.to_path_buf()));
    }

    Ok(Action::ProceedReplace)
}

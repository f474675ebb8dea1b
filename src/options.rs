//! Configuration options for copy operations.
//!
//! # Example
//!
//! ```
//! use treecopy::CopyOptions;
//!
//! let options = CopyOptions::default()
//!     .with_overwrite()
//!     .with_preserve_timestamps();
//! assert!(options.overwrite);
//! ```

/// Options for copy operations.
///
/// Use [`Default::default()`] to get the defaults, then customize using the
/// builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `overwrite` | `false` | Fail if a destination entry exists |
/// | `preserve_timestamps` | `false` | Leave destination times at "now" |
/// | `fsync` | `true` | Sync file data before it is renamed into place |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CopyOptions {
    /// Replace existing destination entries (default: false)
    ///
    /// Only entries whose name collides with a source entry are replaced.
    /// A directory is never replaced by a non-directory or the other way
    /// around, see [`Error::TypeMismatch`](crate::Error::TypeMismatch).
    pub overwrite: bool,

    /// Copy access and modification times from the source (default: false)
    ///
    /// Both times are applied together after the content is in place. This
    /// covers files, directories and the symlinks themselves.
    pub preserve_timestamps: bool,

    /// Whether to sync files to disk before renaming them into place
    /// (default: true)
    ///
    /// This ensures durability but may slow down copies.
    pub fsync: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            preserve_timestamps: false,
            fsync: true,
        }
    }
}

impl CopyOptions {
    /// Allow replacing existing destination entries
    #[must_use]
    pub fn with_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Copy access and modification times from the source
    #[must_use]
    pub fn with_preserve_timestamps(mut self) -> Self {
        self.preserve_timestamps = true;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }
}

//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and executing
//! copy operations. This is often more convenient than manually constructing
//! [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! // Fails if anything already exists at "dst"
//! let stats = CopyBuilder::new("src", "dst").run()?;
//! println!("Copied {} files", stats.files_copied);
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Refreshing a Copy
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! let stats = CopyBuilder::new("src", "dst")
//!     .overwrite()            // Replace colliding entries
//!     .preserve_timestamps()  // Keep atime/mtime
//!     .run()?;
//! # Ok::<(), treecopy::Error>(())
//! ```

use crate::copy::{CopyStats, copy, copy_sync};
use crate::error::Result;
use crate::options::CopyOptions;
use std::path::{Path, PathBuf};

/// A builder for configuring and executing copy operations.
///
/// The source may be a file, a directory or a symlink; the builder runs the
/// same dispatch as [`copy_sync`].
///
/// # Example
///
/// ```no_run
/// use treecopy::CopyBuilder;
///
/// let stats = CopyBuilder::new("/data/project", "/backup/project")
///     .overwrite()
///     .no_fsync()
///     .run()?;
/// # Ok::<(), treecopy::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination paths.
    ///
    /// Uses default options (no overwrite, no timestamp preservation, fsync).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Replace existing destination entries.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use treecopy::CopyBuilder;
    ///
    /// let stats = CopyBuilder::new("src", "dst")
    ///     .overwrite()
    ///     .run()?;
    /// # Ok::<(), treecopy::Error>(())
    /// ```
    #[must_use]
    pub fn overwrite(mut self) -> Self {
        self.options = self.options.with_overwrite();
        self
    }

    /// Copy access and modification times from the source.
    #[must_use]
    pub fn preserve_timestamps(mut self) -> Self {
        self.options = self.options.with_preserve_timestamps();
        self
    }

    /// Disable fsync after writing files.
    ///
    /// Faster, but data may be lost if the system crashes right after the
    /// copy.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Replace all options at once.
    #[must_use]
    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the copy operation, blocking the current thread.
    ///
    /// # Errors
    ///
    /// See [`copy_sync`].
    pub fn run(self) -> Result<CopyStats> {
        copy_sync(&self.src, &self.dst, &self.options)
    }

    /// Execute the copy operation inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// See [`copy_sync`].
    pub async fn run_async(self) -> Result<CopyStats> {
        copy(&self.src, &self.dst, &self.options).await
    }
}

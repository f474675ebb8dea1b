//! # treecopy
//!
//! Recursive, policy-driven copying of files, directories and symlinks for
//! Rust, with identical blocking and async APIs.
//!
//! ## Core Features
//!
//! - **One entry point**: [`copy_sync`] / [`copy`] accept a file, a directory
//!   or a symlink and do the right thing for each
//! - **Self-copy protection**: copying a path onto itself or into its own
//!   subtree is rejected before anything is written, even through `..` or
//!   symlinked parent directories
//! - **Explicit overwrite policy**: existing entries are an error unless
//!   `overwrite` is set, and a directory never replaces a file (or the
//!   other way around)
//! - **Symlink aware**: links are recreated with their raw target, never
//!   followed; dangling links are copied as dangling links
//! - **No half-written files**: file content is written to a temporary file
//!   and renamed into place
//! - **Timestamp preserving**: optional atime/mtime copy for files,
//!   directories and links
//! - **Blocking and async**: [`copy_sync`] over `std::fs`, [`copy`] over
//!   `tokio::fs`, running the same algorithm
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use treecopy::CopyBuilder;
//!
//! let stats = CopyBuilder::new("src", "dst").run()?;
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use treecopy::{copy_sync, CopyOptions};
//! use std::path::Path;
//!
//! let options = CopyOptions::default()
//!     .with_overwrite()            // Replace colliding entries
//!     .with_preserve_timestamps(); // Keep atime/mtime
//!
//! copy_sync(Path::new("site"), Path::new("/srv/www/site"), &options)?;
//! # Ok::<(), treecopy::Error>(())
//! ```
//!
//! ## Async
//!
//! ```no_run
//! use treecopy::{copy, CopyOptions};
//! use std::path::Path;
//!
//! # async fn run() -> treecopy::Result<()> {
//! copy(Path::new("a"), Path::new("b"), &CopyOptions::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Semantics
//!
//! The copy is sequential and stops at the first error. Entries copied
//! before the error are left in place; there is no rollback. Re-running with
//! `overwrite` completes an interrupted copy.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] and [`EntryKind`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod options;
mod utils;

pub use builder::CopyBuilder;
pub use copy::{CopyStats, EntryKind, copy, copy_sync};
pub use error::{Error, ErrorCode, Result, is_no_space_error};
pub use options::CopyOptions;

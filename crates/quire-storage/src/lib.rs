//! Content storage for Quire.
//!
//! The slug resolver and the page renderer only ever ask three questions of
//! the content root: does `guides/setup.md` exist, what does it say, and when
//! did it last change. [`Storage`] captures exactly that.
//!
//! - [`FsStorage`] reads a directory on disk.
//! - [`MockStorage`] (feature `mock`) keeps documents in memory for tests.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use quire_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! if storage.exists(Path::new("home.md")) {
//!     let content = storage.read(Path::new("home.md"))?;
//!     println!("{content}");
//! }
//! # Ok::<(), quire_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};

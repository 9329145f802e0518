//! storage layer for subscan
//!
//! this module provides a read-only abstraction over git for the scanner.
//! The upper layer (`scan`) uses this API and never touches git2 directly.
//!
//!  # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SuperRepository                         │
//! │  (revisions, declared submodules, submodule checkouts)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │   commit    │       │    tree     │       │    refs     │
//!  │   (walk)    │       │   (links)   │       │ (HEAD/tags) │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//!  ```
//!
//! # Usage
//!
//! ```no_run
//! use subscan::storage::SuperRepository;
//!
//! # fn main() -> Result<(), subscan::storage::StorageError> {
//! let repo = SuperRepository::open("./super")?;
//! let start = repo.resolve("v1.0")?;
//! let end = repo.resolve("HEAD")?;
//!
//! for commit in repo.walk(start, end) {
//!     let commit = commit?;
//!     for link in repo.tree_at(commit.id)?.commit_links(false)? {
//!         println!("{} pins {} at {}", commit.id.short(), link.path, link.commit);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod commit;
mod error;
mod refs;
mod repository;
mod tree;
mod types;

// Re-export public API
pub use commit::{CommitInfo, FirstParentWalk};
pub use error::{StorageError, StorageResult};
pub use refs::{RefManager, TagInfo, TagLookup};
pub use repository::SuperRepository;
pub use tree::{CommitLink, EntryKind, TreeHandle};
pub use types::{CommitId, InvalidPathError, SubmodulePath, TreeId};

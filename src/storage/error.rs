//! Storage layer error types
//!
//! All errors that can occur while reading repositories are defined here.
//! We use `thiserror` for ergonomic error definition and better error messages

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::types::{CommitId, SubmodulePath};

/// the main error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// error from the underlying Git library
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// the path is not the root of a repository
    #[error("repository not found: {0}")]
    NotFound(PathBuf),

    /// the revision does not resolve to a commit
    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    /// first-parent ancestry of `end` ran out before `start` was seen
    #[error("boundary not reached: {start} is not a first-parent ancestor of {end}")]
    BoundaryNotReached { start: CommitId, end: CommitId },

    /// the repository has no working directory
    #[error("repository has no working directory: {0}")]
    BareRepository(PathBuf),

    /// the submodule's own repository could not be opened
    #[error("submodule unavailable: {path}: {reason}")]
    SubmoduleUnavailable { path: SubmodulePath, reason: String },
}

impl StorageError {
    /// check if this error must abort the whole scan
    pub fn is_fatal(&self) -> bool {
        !self.is_soft()
    }

    /// check if the scan can degrade and carry on after this error
    pub fn is_soft(&self) -> bool {
        matches!(self, StorageError::SubmoduleUnavailable { .. })
    }
}

/// result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

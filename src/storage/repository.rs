//!   Superproject repository wrapper.
//!
//!  This is the central component of the storage layer. It wraps
//!  `git2::Repository` and provides the read-only operations the scanner
//!  needs: revision resolution, the declared submodule set, and access to
//!  submodule checkouts.
//!
//! All other storage modules use this for Git access.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, warn};

use crate::storage::commit::{self, FirstParentWalk};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::refs::{self, RefManager, TagLookup};
use crate::storage::tree::TreeHandle;
use crate::storage::types::{CommitId, SubmodulePath};

/// The superproject repository.
pub struct SuperRepository {
    repo: Repository,
    path: PathBuf,
}

impl SuperRepository {
    /// Open an existing repository.
    ///
    /// `path` must be the repository root; parent directories are not searched.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let repo = refs::open_existing(path)?;
        debug!(path = %path.display(), "opened repository");

        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    /// Get the working directory.
    pub fn workdir(&self) -> StorageResult<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| StorageError::BareRepository(self.path.clone()))
    }

    // ==================== Commits ====================

    /// Resolve a revision (hex id, abbreviated id, branch, tag, `HEAD~n`) to a commit.
    pub fn resolve(&self, rev: &str) -> StorageResult<CommitId> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|_| StorageError::UnknownRevision(rev.to_string()))?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| StorageError::UnknownRevision(rev.to_string()))?;
        Ok(CommitId::new(commit.id()))
    }

    /// Get the tree at a specific commit.
    pub fn tree_at(&self, id: CommitId) -> StorageResult<TreeHandle<'_>> {
        commit::get_tree_at_commit(&self.repo, id)
    }

    /// Walk first-parent history over `(start, end]`, newest first.
    pub fn walk(&self, start: CommitId, end: CommitId) -> FirstParentWalk<'_> {
        commit::walk(&self.repo, start, end)
    }

    // ==================== Submodules ====================

    /// The submodule paths declared in `.gitmodules`, checked out or not.
    ///
    /// libgit2 also lists bare gitlinks found in HEAD or the index; those
    /// carry no url and are not registrations, so they are left out.
    pub fn submodule_paths(&self) -> StorageResult<BTreeSet<SubmodulePath>> {
        let mut paths = BTreeSet::new();
        for submodule in self.repo.submodules()? {
            if submodule.url().is_none() {
                debug!(path = %submodule.path().display(), "gitlink without registration");
                continue;
            }
            match SubmodulePath::from_path(submodule.path()) {
                Ok(path) => {
                    paths.insert(path);
                }
                Err(e) => warn!(
                    path = %submodule.path().display(),
                    error = %e,
                    "ignoring submodule with unusable path"
                ),
            }
        }
        Ok(paths)
    }

    /// The commit-link pinned for `path` in the superproject's HEAD tree.
    pub fn pinned_submodule_head(&self, path: &SubmodulePath) -> StorageResult<Option<CommitId>> {
        let head = match RefManager::head_commit(&self.repo) {
            Ok(head) => head,
            Err(StorageError::Git(e)) if e.code() == git2::ErrorCode::UnbornBranch => {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };
        Ok(self.tree_at(head)?.commit_link_at(path))
    }

    /// Where the checkout of a submodule lives on disk.
    pub fn checkout_path(&self, path: &SubmodulePath) -> StorageResult<PathBuf> {
        Ok(path.under(self.workdir()?))
    }

    /// The commit checked out in the submodule's own repository.
    ///
    /// The submodule repository is opened and released inside this call.
    pub fn checkout_head(&self, path: &SubmodulePath) -> StorageResult<CommitId> {
        let unavailable = |reason: String| StorageError::SubmoduleUnavailable {
            path: path.clone(),
            reason,
        };

        let checkout = self.checkout_path(path)?;
        let repo = refs::open_existing(&checkout).map_err(|e| unavailable(e.to_string()))?;
        RefManager::head_commit(&repo).map_err(|e| unavailable(e.to_string()))
    }

    /// The newest tag of a submodule's checkout.
    pub fn latest_tag(&self, path: &SubmodulePath) -> TagLookup {
        match self.checkout_path(path) {
            Ok(checkout) => RefManager::latest_tag(&checkout),
            Err(e) => TagLookup::Unavailable(e.to_string()),
        }
    }
}

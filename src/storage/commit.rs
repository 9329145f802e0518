//!  Commit lookup and first-parent history traversal
//!
//! the range walker starts at the newer commit and follows first parents
//! back towards the older one:
//! - `end` is inclusive, `start` is exclusive
//! - merged-in branches are never visited
//! - running out of parents before reaching `start` is an error, never a
//!   silent stop

use chrono::{DateTime, TimeZone, Utc};
use git2::Repository;
use tracing::{debug, trace};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::tree::TreeHandle;
use crate::storage::types::{CommitId, TreeId};

/// information about a commit
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: CommitId,
    pub tree_id: TreeId,
    pub parent_ids: Vec<CommitId>,
    pub message: String,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// create CommitInfo from a git2::Commit
    pub(crate) fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let author = commit.author();
        Self {
            id: CommitId::new(commit.id()),
            tree_id: TreeId::new(commit.tree_id()),
            parent_ids: commit.parent_ids().map(CommitId::new).collect(),
            message: commit.message().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("Unknown").to_string(),
            timestamp: commit_time(commit),
        }
    }

    /// check if this is a merge commit (has multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// get the first (or only) parent
    pub fn first_parent(&self) -> Option<CommitId> {
        self.parent_ids.first().copied()
    }

    /// get a short summary of the commit (first line of message)
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or(&self.message)
    }
}

/// committer time of a commit as UTC
pub(crate) fn commit_time(commit: &git2::Commit<'_>) -> DateTime<Utc> {
    Utc.timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default()
}

/// get information about a commit
pub fn get_commit(repo: &Repository, id: CommitId) -> StorageResult<CommitInfo> {
    let commit = repo
        .find_commit(id.raw())
        .map_err(|_| StorageError::UnknownRevision(id.to_string()))?;

    Ok(CommitInfo::from_git2(&commit))
}

/// get the tree snapshot at a specific commit
pub fn get_tree_at_commit(repo: &Repository, commit_id: CommitId) -> StorageResult<TreeHandle<'_>> {
    let commit = repo
        .find_commit(commit_id.raw())
        .map_err(|_| StorageError::UnknownRevision(commit_id.to_string()))?;

    let tree = commit.tree()?;
    Ok(TreeHandle::new(repo, tree))
}

/// lazy first-parent walk from `end` back to (but excluding) `start`
pub struct FirstParentWalk<'repo> {
    repo: &'repo Repository,
    start: CommitId,
    end: CommitId,
    next: Option<CommitId>,
    exhausted: bool,
}

impl<'repo> FirstParentWalk<'repo> {
    /// create a new walk over `(start, end]`
    pub fn new(repo: &'repo Repository, start: CommitId, end: CommitId) -> Self {
        Self {
            repo,
            start,
            end,
            next: Some(end),
            exhausted: false,
        }
    }
}

impl<'repo> Iterator for FirstParentWalk<'repo> {
    type Item = StorageResult<CommitInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let current = match self.next.take() {
            Some(id) if id == self.start => {
                self.exhausted = true;
                return None;
            }
            Some(id) => id,
            None => {
                // the previous commit was a root and start never came up
                self.exhausted = true;
                return Some(Err(StorageError::BoundaryNotReached {
                    start: self.start,
                    end: self.end,
                }));
            }
        };

        match get_commit(self.repo, current) {
            Ok(info) => {
                trace!(commit = %info.id.short(), summary = info.summary(), "visiting commit");
                if info.is_merge() {
                    debug!(
                        commit = %info.id.short(),
                        skipped = info.parent_ids.len() - 1,
                        "merge commit, following first parent only"
                    );
                }
                self.next = info.first_parent();
                Some(Ok(info))
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for FirstParentWalk<'_> {}

/// walk first-parent history over `(start, end]`
pub fn walk(repo: &Repository, start: CommitId, end: CommitId) -> FirstParentWalk<'_> {
    FirstParentWalk::new(repo, start, end)
}

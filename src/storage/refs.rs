//!  Reference lookup: HEAD and tags.
//!
//!  Git refs are pointers to commits. This module handles:
//! - resolving HEAD of a repository
//! - enumerating `refs/tags/*` and peeling annotated tags to commits
//! - picking the newest tag of a submodule checkout
//!
//! Every repository opened here is opened read-only with `Repository::open`
//! (no upward search) and dropped before the function returns.

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::Repository;
use serde::Serialize;
use tracing::debug;

use crate::storage::commit::commit_time;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::CommitId;

/// a tag peeled to the commit it names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    /// short name, without `refs/tags/`
    pub name: String,
    pub target: CommitId,
    pub timestamp: DateTime<Utc>,
    pub annotated: bool,
}

/// outcome of looking for the newest tag of a submodule checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    Found(TagInfo),
    /// the repository opened but holds no tag that peels to a commit
    NoTags,
    /// the checkout is missing or is not a repository
    Unavailable(String),
}

impl TagLookup {
    /// the tag, if one was found
    pub fn tag(&self) -> Option<&TagInfo> {
        match self {
            TagLookup::Found(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Reads references.
pub struct RefManager;

impl RefManager {
    const TAG_PREFIX: &'static str = "refs/tags/";

    /// Get the commit HEAD points at.
    pub fn head_commit(repo: &Repository) -> StorageResult<CommitId> {
        let head = repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(CommitId::new(commit.id()))
    }

    /// List every tag that peels to a commit, sorted by name.
    ///
    /// Tags pointing at trees or blobs are skipped.
    pub fn list_tags(repo: &Repository) -> StorageResult<Vec<TagInfo>> {
        let mut tags = Vec::new();

        for reference in repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            let Some(full_name) = reference.name() else {
                debug!("skipping tag with non utf-8 name");
                continue;
            };
            let name = full_name
                .strip_prefix(Self::TAG_PREFIX)
                .unwrap_or(full_name)
                .to_string();

            let annotated = reference.peel_to_tag().is_ok();
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(e) => {
                    debug!(tag = %name, error = %e, "tag does not point at a commit");
                    continue;
                }
            };

            tags.push(TagInfo {
                name,
                target: CommitId::new(commit.id()),
                timestamp: commit_time(&commit),
                annotated,
            });
        }

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    /// Pick the tag whose commit is newest.
    ///
    /// Equal timestamps go to the lexicographically greatest name.
    pub fn newest_tag(tags: Vec<TagInfo>) -> Option<TagInfo> {
        tags.into_iter()
            .max_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.name.cmp(&b.name)))
    }

    /// Find the newest tag of the repository at `path`.
    ///
    /// Never fails: a missing path, a non-repository or an unreadable ref
    /// store degrade to `Unavailable`, an empty tag list to `NoTags`.
    pub fn latest_tag(path: &Path) -> TagLookup {
        let repo = match open_existing(path) {
            Ok(repo) => repo,
            Err(e) => return TagLookup::Unavailable(e.to_string()),
        };

        let tags = match Self::list_tags(&repo) {
            Ok(tags) => tags,
            Err(e) => return TagLookup::Unavailable(e.to_string()),
        };
        debug!(path = %path.display(), count = tags.len(), "listed tags");

        match Self::newest_tag(tags) {
            Some(tag) => TagLookup::Found(tag),
            None => TagLookup::NoTags,
        }
    }
}

/// open a repository rooted exactly at `path` without touching the filesystem
pub(crate) fn open_existing(path: &Path) -> StorageResult<Repository> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }
    Repository::open(path).map_err(|_| StorageError::NotFound(path.to_path_buf()))
}

//!  tree inspection for submodule links.
//!
//! in Git, a tree is a directory. Each entry is one of:
//! - a blob (file content)
//! - a tree (subdirectory)
//! - a commit-link (gitlink, filemode `160000`): the pinned commit of a submodule
//!
//! this module classifies entries and pulls the commit-links out of a
//! commit's tree, either from the top level only or recursively.

use git2::{ObjectType, Repository, Tree, TreeEntry};
use tracing::trace;

use crate::storage::error::StorageResult;
use crate::storage::types::{CommitId, SubmodulePath};

/// the kind of object a tree entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
    CommitLink,
    Other,
}

impl EntryKind {
    /// classify a git2 tree entry
    pub fn of(entry: &TreeEntry<'_>) -> Self {
        match entry.kind() {
            Some(ObjectType::Blob) => EntryKind::Blob,
            Some(ObjectType::Tree) => EntryKind::Tree,
            Some(ObjectType::Commit) => EntryKind::CommitLink,
            _ => EntryKind::Other,
        }
    }
}

/// a submodule pointer found in a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitLink {
    pub path: SubmodulePath,
    pub commit: CommitId,
}

/// A read only handle to a git tree at a specific commit
///
/// this provides safe, immutable access to the tree structure.
/// think of it as a snapshot - it won't change even if new commits are made.
pub struct TreeHandle<'repo> {
    repo: &'repo Repository,
    tree: Tree<'repo>,
}

impl<'repo> TreeHandle<'repo> {
    /// create a TreeHandle from a git2::Tree
    pub(crate) fn new(repo: &'repo Repository, tree: Tree<'repo>) -> Self {
        Self { repo, tree }
    }

    /// list the commit-links in this tree.
    ///
    /// with `recursive` unset only top-level entries are considered;
    /// otherwise subtrees are descended and names joined with `/`.
    /// entries whose names can't form a valid path are skipped.
    pub fn commit_links(&self, recursive: bool) -> StorageResult<Vec<CommitLink>> {
        let mut links = Vec::new();
        collect_links(self.repo, &self.tree, None, recursive, &mut links)?;
        Ok(links)
    }

    /// look up the commit-link at a path, if that path holds one
    pub fn commit_link_at(&self, path: &SubmodulePath) -> Option<CommitId> {
        let entry = self.tree.get_path(std::path::Path::new(path.as_str())).ok()?;
        match EntryKind::of(&entry) {
            EntryKind::CommitLink => Some(CommitId::new(entry.id())),
            _ => None,
        }
    }
}

fn collect_links<'repo>(
    repo: &'repo Repository,
    tree: &Tree<'repo>,
    prefix: Option<&SubmodulePath>,
    recursive: bool,
    out: &mut Vec<CommitLink>,
) -> StorageResult<()> {
    for entry in tree.iter() {
        let Some(name) = entry.name() else {
            continue;
        };

        let path = match prefix {
            Some(p) => p.join(name),
            None => SubmodulePath::new(name),
        };
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                trace!(name, error = %e, "skipping tree entry");
                continue;
            }
        };

        match EntryKind::of(&entry) {
            EntryKind::CommitLink => out.push(CommitLink {
                path,
                commit: CommitId::new(entry.id()),
            }),
            EntryKind::Tree if recursive => {
                let subtree = repo.find_tree(entry.id())?;
                collect_links(repo, &subtree, Some(&path), recursive, out)?;
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{oid, write_tree, TreeItem};
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn handle<'r>(repo: &'r Repository, entries: &[(&str, TreeItem<'_>)]) -> TreeHandle<'r> {
        let tree_id = write_tree(repo, entries);
        TreeHandle::new(repo, repo.find_tree(tree_id).unwrap())
    }

    #[test]
    fn test_top_level_links_only() {
        let (_dir, repo) = setup_repo();
        let tree = handle(
            &repo,
            &[
                ("README.md", TreeItem::File(b"hello")),
                ("lib", TreeItem::Link(oid('a'))),
                ("vendor/nested", TreeItem::Link(oid('b'))),
            ],
        );

        let links = tree.commit_links(false).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path.as_str(), "lib");
        assert_eq!(links[0].commit.raw(), oid('a'));
    }

    #[test]
    fn test_recursive_links() {
        let (_dir, repo) = setup_repo();
        let tree = handle(
            &repo,
            &[
                ("lib", TreeItem::Link(oid('a'))),
                ("vendor/nested", TreeItem::Link(oid('b'))),
                ("vendor/docs/guide.md", TreeItem::File(b"guide")),
            ],
        );

        let links = tree.commit_links(true).unwrap();
        let paths: Vec<_> = links.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, ["lib", "vendor/nested"]);
        assert_eq!(links[1].commit.raw(), oid('b'));
    }

    #[test]
    fn test_commit_link_at() {
        let (_dir, repo) = setup_repo();
        let tree = handle(
            &repo,
            &[
                ("file", TreeItem::File(b"x")),
                ("vendor/nested", TreeItem::Link(oid('c'))),
            ],
        );

        let nested = SubmodulePath::new("vendor/nested").unwrap();
        assert_eq!(tree.commit_link_at(&nested).map(|c| c.raw()), Some(oid('c')));

        // blobs and directories are not links
        assert_eq!(tree.commit_link_at(&SubmodulePath::new("file").unwrap()), None);
        assert_eq!(tree.commit_link_at(&SubmodulePath::new("vendor").unwrap()), None);
        assert_eq!(tree.commit_link_at(&SubmodulePath::new("missing").unwrap()), None);
    }

    #[test]
    fn test_entry_kinds() {
        let (_dir, repo) = setup_repo();
        let tree_id = write_tree(
            &repo,
            &[
                ("a.txt", TreeItem::File(b"a")),
                ("dir/b.txt", TreeItem::File(b"b")),
                ("sub", TreeItem::Link(oid('d'))),
            ],
        );
        let tree = repo.find_tree(tree_id).unwrap();

        let kinds: Vec<_> = tree.iter().map(|e| EntryKind::of(&e)).collect();
        assert_eq!(kinds, [EntryKind::Blob, EntryKind::Tree, EntryKind::CommitLink]);
    }
}

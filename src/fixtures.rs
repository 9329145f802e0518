//! Test fixtures: repositories built directly with git2.

use std::collections::BTreeMap;
use std::path::Path;

use git2::{FileMode, Oid, Repository, Signature, Time};
use tempfile::TempDir;

use crate::storage::{SubmodulePath, SuperRepository};

/// something to put in a tree at a path
#[derive(Debug, Clone, Copy)]
pub(crate) enum TreeItem<'a> {
    File(&'a [u8]),
    /// a submodule commit-link
    Link(Oid),
}

/// an oid made of one repeated hex digit, e.g. `oid('a')` is `aaaa...`
pub(crate) fn oid(digit: char) -> Oid {
    Oid::from_str(&digit.to_string().repeat(40)).unwrap()
}

/// a signature with a fixed timestamp
pub(crate) fn signature_at(seconds: i64) -> Signature<'static> {
    Signature::new("Test", "test@test.com", &Time::new(seconds, 0)).unwrap()
}

/// write a tree; `/` in paths creates subtrees
pub(crate) fn write_tree(repo: &Repository, entries: &[(&str, TreeItem<'_>)]) -> Oid {
    let mut builder = repo.treebuilder(None).unwrap();
    let mut nested: BTreeMap<&str, Vec<(&str, TreeItem<'_>)>> = BTreeMap::new();

    for &(path, item) in entries {
        if let Some((dir, rest)) = path.split_once('/') {
            nested.entry(dir).or_default().push((rest, item));
            continue;
        }
        match item {
            TreeItem::File(bytes) => {
                let blob = repo.blob(bytes).unwrap();
                builder.insert(path, blob, FileMode::Blob.into()).unwrap();
            }
            TreeItem::Link(id) => {
                builder.insert(path, id, FileMode::Commit.into()).unwrap();
            }
        }
    }

    for (dir, children) in nested {
        let subtree = write_tree(repo, &children);
        builder.insert(dir, subtree, FileMode::Tree.into()).unwrap();
    }

    builder.write().unwrap()
}

/// create a commit without moving any ref
pub(crate) fn commit_at(repo: &Repository, tree: Oid, parents: &[Oid], seconds: i64, message: &str) -> Oid {
    let tree = repo.find_tree(tree).unwrap();
    let parents: Vec<_> = parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
    let parent_refs: Vec<_> = parents.iter().collect();
    let sig = signature_at(seconds);
    repo.commit(None, &sig, &sig, message, &tree, &parent_refs).unwrap()
}

/// `.gitmodules` content declaring the given paths
pub(crate) fn gitmodules(paths: &[&str]) -> String {
    paths
        .iter()
        .map(|p| format!("[submodule \"{p}\"]\n\tpath = {p}\n\turl = https://example.com/{p}.git\n"))
        .collect()
}

/// init a submodule checkout repository under a superproject workdir
pub(crate) fn init_checkout(workdir: &Path, path: &SubmodulePath) -> Repository {
    Repository::init(path.under(workdir)).unwrap()
}

/// a superproject with declared submodules and a linear history on HEAD
pub(crate) struct SuperFixture {
    pub dir: TempDir,
    pub repo: Repository,
    gitmodules: String,
}

impl SuperFixture {
    /// init a repository whose workdir `.gitmodules` declares `submodules`
    pub fn new(submodules: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let gitmodules = gitmodules(submodules);
        if !submodules.is_empty() {
            std::fs::write(dir.path().join(".gitmodules"), &gitmodules).unwrap();
        }
        Self { dir, repo, gitmodules }
    }

    pub fn workdir(&self) -> &Path {
        self.dir.path()
    }

    /// commit `entries` (plus `.gitmodules`) on top of HEAD and move HEAD
    pub fn commit(&self, entries: &[(&str, TreeItem<'_>)], seconds: i64) -> Oid {
        let mut all = entries.to_vec();
        if !self.gitmodules.is_empty() {
            all.push((".gitmodules", TreeItem::File(self.gitmodules.as_bytes())));
        }
        let tree = write_tree(&self.repo, &all);

        let parent = self.repo.head().ok().and_then(|h| h.target());
        let parents: Vec<Oid> = parent.into_iter().collect();
        let id = commit_at(&self.repo, tree, &parents, seconds, &format!("commit at {seconds}"));
        self.repo
            .reference("refs/heads/master", id, true, "fixture")
            .unwrap();
        self.repo.set_head("refs/heads/master").unwrap();
        id
    }

    pub fn open(&self) -> SuperRepository {
        SuperRepository::open(self.workdir()).unwrap()
    }
}

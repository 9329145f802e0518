//! Submodule change detection.
//!
//! The detector is fed the commits of a first-parent walk, newest first, and
//! records for every submodule path the commit-link that differed from its
//! baseline. Later observations overwrite earlier ones, so once the walk is
//! done each path maps to the link seen in the OLDEST differing commit.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::storage::{CommitId, CommitInfo, StorageResult, SubmodulePath, SuperRepository};

/// Submodule path to the commit-link recorded for it.
pub type UpdateRecord = BTreeMap<SubmodulePath, CommitId>;

/// What a commit-link is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BaselineMode {
    /// The commit checked out in the submodule's own repository, falling
    /// back to the link pinned in the superproject's HEAD.
    #[default]
    Checkout,
    /// The link at the same path in the commit's first parent.
    Parent,
}

/// The currently known head of a declared submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Read from the submodule checkout.
    Checkout(CommitId),
    /// The checkout is unavailable; the link pinned in HEAD stands in.
    Pinned(CommitId),
    /// Neither is available.
    Unknown,
}

impl Baseline {
    /// check if a commit-link counts as a change against this baseline
    pub fn differs_from(&self, link: CommitId) -> bool {
        match self {
            Baseline::Checkout(id) | Baseline::Pinned(id) => *id != link,
            Baseline::Unknown => true,
        }
    }
}

/// Accumulates submodule updates over a walk.
pub struct ChangeDetector<'repo> {
    repo: &'repo SuperRepository,
    mode: BaselineMode,
    recursive: bool,
    declared: BTreeSet<SubmodulePath>,
    baselines: BTreeMap<SubmodulePath, Baseline>,
    updates: UpdateRecord,
}

impl<'repo> ChangeDetector<'repo> {
    /// Create a detector; loads the declared submodule set up front.
    pub fn new(repo: &'repo SuperRepository, mode: BaselineMode, recursive: bool) -> StorageResult<Self> {
        let declared = repo.submodule_paths()?;
        debug!(count = declared.len(), ?mode, recursive, "declared submodules");

        Ok(Self {
            repo,
            mode,
            recursive,
            declared,
            baselines: BTreeMap::new(),
            updates: UpdateRecord::new(),
        })
    }

    /// Inspect one commit of the walk.
    pub fn observe(&mut self, commit: &CommitInfo) -> StorageResult<()> {
        let links = self.repo.tree_at(commit.id)?.commit_links(self.recursive)?;
        if links.is_empty() {
            return Ok(());
        }

        let parent_tree = match (self.mode, commit.first_parent()) {
            (BaselineMode::Parent, Some(parent)) => Some(self.repo.tree_at(parent)?),
            _ => None,
        };

        for link in links {
            let changed = match self.mode {
                BaselineMode::Checkout => {
                    if self.declared.contains(&link.path) {
                        self.baseline(&link.path)?.differs_from(link.commit)
                    } else {
                        debug!(path = %link.path, "commit-link not declared, treating as new");
                        true
                    }
                }
                BaselineMode::Parent => {
                    let previous = parent_tree.as_ref().and_then(|t| t.commit_link_at(&link.path));
                    previous != Some(link.commit)
                }
            };

            if changed {
                debug!(
                    commit = %commit.id.short(),
                    path = %link.path,
                    link = %link.commit.short(),
                    "recording submodule update"
                );
                self.updates.insert(link.path, link.commit);
            }
        }

        Ok(())
    }

    /// Baseline for a declared submodule, computed once per run.
    fn baseline(&mut self, path: &SubmodulePath) -> StorageResult<Baseline> {
        if let Some(baseline) = self.baselines.get(path) {
            return Ok(*baseline);
        }

        let baseline = match self.repo.checkout_head(path) {
            Ok(head) => Baseline::Checkout(head),
            Err(e) if e.is_soft() => {
                warn!(error = %e, "comparing against the commit pinned in HEAD instead");
                match self.repo.pinned_submodule_head(path)? {
                    Some(pinned) => Baseline::Pinned(pinned),
                    None => Baseline::Unknown,
                }
            }
            Err(e) => return Err(e),
        };
        debug!(path = %path, ?baseline, "resolved baseline");

        self.baselines.insert(path.clone(), baseline);
        Ok(baseline)
    }

    /// Finish the walk and hand over the record.
    pub fn finish(self) -> UpdateRecord {
        self.updates
    }
}

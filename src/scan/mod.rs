//! Submodule update scan.
//!
//! One pass, one entry point:
//!
//! 1. open the superproject and resolve `start` and `end`
//! 2. walk `(start, end]` by first parent, feeding each commit to the detector
//! 3. look up the newest tag of every updated submodule's checkout
//! 4. return a [`ScanReport`] sorted by submodule path
//!
//! Errors returned from [`run`] are fatal. Unavailable submodule checkouts
//! and missing tags degrade inside the report instead.

mod config;
mod detector;
mod error;
mod report;

pub use config::ScanConfig;
pub use detector::{Baseline, BaselineMode, ChangeDetector, UpdateRecord};
pub use error::{ScanError, ScanResult};
pub use report::{OutputFormat, ScanReport, SubmoduleUpdate};

use tracing::{info, warn};

use crate::storage::{SuperRepository, TagLookup};

/// Run a scan described by `config`.
pub fn run(config: &ScanConfig) -> ScanResult<ScanReport> {
    let repo = SuperRepository::open(&config.repo_path)?;
    let workdir = repo.workdir()?;
    let start = repo.resolve(&config.start)?;
    let end = repo.resolve(&config.end)?;
    info!(
        repo = %workdir.display(),
        start = %start.short(),
        end = %end.short(),
        "scanning submodule updates"
    );

    let mut detector = ChangeDetector::new(&repo, config.baseline, config.recursive)?;
    let mut commits_scanned = 0;
    for commit in repo.walk(start, end) {
        detector.observe(&commit?)?;
        commits_scanned += 1;
    }

    let updates: Vec<SubmoduleUpdate> = detector
        .finish()
        .into_iter()
        .map(|(path, commit)| {
            let tag = repo.latest_tag(&path);
            if let TagLookup::Unavailable(reason) = &tag {
                warn!(path = %path, %reason, "cannot read tags of submodule checkout");
            }
            SubmoduleUpdate { path, commit, tag }
        })
        .collect();
    info!(commits_scanned, updated = updates.len(), "scan complete");

    Ok(ScanReport {
        start: config.start.clone(),
        end: config.end.clone(),
        start_id: start,
        end_id: end,
        commits_scanned,
        updates,
    })
}

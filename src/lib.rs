//! subscan - report submodules updated across a commit range
//!
//! This crate walks the first-parent history of a superproject between two
//! commits, finds the submodules whose commit-link changed along the way, and
//! looks up the newest tag of each changed submodule's checkout.
//! Scanning is read-only: nothing in the working copy is created or modified.
//!
//! # Example
//!
//! ```no_run
//! use subscan::scan::{self, ScanConfig};
//!
//! let config = ScanConfig::new("./super", "v1.0", "HEAD");
//! let report = scan::run(&config).unwrap();
//! print!("{}", report);
//! ```

pub mod cli;
pub mod logging;
pub mod scan;
pub mod storage;

#[cfg(test)]
pub(crate) mod fixtures;

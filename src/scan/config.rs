//! Scan configuration.

use std::path::PathBuf;

use crate::scan::detector::BaselineMode;
use crate::scan::report::OutputFormat;

/// Everything a scan needs, passed explicitly into [`crate::scan::run`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Path to the superproject working copy.
    pub repo_path: PathBuf,
    /// Older revision; exclusive boundary of the walk.
    pub start: String,
    /// Newer revision; inclusive starting point of the walk.
    pub end: String,
    /// Look for commit-links inside subdirectories too.
    pub recursive: bool,
    /// What a commit-link is compared against.
    pub baseline: BaselineMode,
    /// How the report is rendered.
    pub format: OutputFormat,
}

impl ScanConfig {
    /// Create a new configuration for the range `(start, end]`.
    pub fn new(repo_path: impl Into<PathBuf>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            start: start.into(),
            end: end.into(),
            recursive: false,
            baseline: BaselineMode::default(),
            format: OutputFormat::default(),
        }
    }

    /// Set recursive flag.
    pub fn recursive(mut self, value: bool) -> Self {
        self.recursive = value;
        self
    }

    /// Set baseline mode.
    pub fn baseline(mut self, mode: BaselineMode) -> Self {
        self.baseline = mode;
        self
    }

    /// Set output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

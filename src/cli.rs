//! Command line interface.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use crate::scan::{self, BaselineMode, OutputFormat, ScanConfig, ScanResult};

/// Exit status of a completed scan, including one with no updates.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status when the scan aborts.
pub const EXIT_FAILURE: u8 = 1;

/// Report which submodules changed between two commits of a superproject,
/// with the newest tag of each changed submodule.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the superproject working copy
    pub repo_path: PathBuf,

    /// Older revision; the walk stops before it
    pub start_commit: String,

    /// Newer revision; the walk starts here
    pub end_commit: String,

    /// Inspect commit-links inside subdirectories too
    #[arg(short, long)]
    pub recursive: bool,

    /// What each commit-link is compared against
    #[arg(short, long, value_enum, default_value_t = BaselineMode::Checkout)]
    pub baseline: BaselineMode,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace); SUBSCAN_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the scan configuration these arguments describe.
    pub fn to_config(&self) -> ScanConfig {
        ScanConfig::new(&self.repo_path, &self.start_commit, &self.end_commit)
            .recursive(self.recursive)
            .baseline(self.baseline)
            .format(self.format)
    }
}

/// Run the scan `cli` describes, writing the report to `out` and a fatal
/// error to `err` as `Error: <message>`. Returns the process exit status.
pub fn execute(cli: &Cli, out: &mut impl Write, err: &mut impl Write) -> u8 {
    match scan_into(cli, out) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            EXIT_FAILURE
        }
    }
}

fn scan_into(cli: &Cli, out: &mut impl Write) -> ScanResult<()> {
    let config = cli.to_config();
    let report = scan::run(&config)?;
    out.write_all(report.render(config.format)?.as_bytes())?;
    out.flush()?;
    Ok(())
}

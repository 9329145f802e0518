//! subscan - report submodules updated across a commit range
//!
//! This is the main entry point for the command-line interface.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use subscan::cli::{self, Cli};
use subscan::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logger(cli.verbose);

    let status = cli::execute(&cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(status)
}

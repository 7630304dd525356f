//! cli::args
//!
//! Command-line argument definitions using clap derive.

use clap::Parser;
use std::path::PathBuf;

/// drift - does the target branch actually differ in code, or just in history?
#[derive(Parser, Debug)]
#[command(name = "drift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Compare against the local main branch
    drift main

    # Compare against a remote branch, skipping the automatic fetch
    drift origin/develop --no-fetch

    # Machine-readable output for scripting
    drift main --json")]
pub struct Cli {
    /// Target reference to compare HEAD against (branch or remote/branch)
    pub target: Option<String>,

    /// Include the scanned merge history in the report
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the automatic remote refresh before resolving remote refs
    #[arg(long)]
    pub no_fetch: bool,

    /// Emit the full analysis as a single JSON record
    #[arg(long)]
    pub json: bool,

    /// Minimal output: a single verdict line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Run as if drift was started in this directory
    #[arg(long, value_name = "PATH")]
    pub cwd: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

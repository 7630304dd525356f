//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse arguments and resolve them against configuration
//! - Run the analyzer
//! - Hand the immutable report to the presentation layer (or serialize it)
//!
//! The CLI performs no repository queries of its own beyond opening the
//! repository; all analysis flows through [`crate::analyzer`].
//!
//! # Exit codes
//!
//! 0 on success (including `--help`); 1 on a missing target, validation
//! failure, or any propagated error. `main` maps the error into the exit
//! code; this module only returns `Result`.

pub mod args;

pub use args::Cli;

use anyhow::{bail, Context as _, Result};
use clap::CommandFactory;
use std::io::IsTerminal;

use crate::analyzer::{self, AnalyzeError, AnalyzeOptions};
use crate::core::config::Config;
use crate::core::types::BranchRef;
use crate::ui::{self, output, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let Some(target) = cli.target.as_deref() else {
        // Mirror the help text, but a missing target is still an error.
        Cli::command().print_help().ok();
        bail!("missing required <TARGET> reference");
    };

    // Charset check before any repository access.
    let target = BranchRef::new(target).map_err(|e| AnalyzeError::InvalidReference(e.to_string()))?;

    let cwd = match cli.cwd {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let git = analyzer::open_repository(&cwd)?;

    let config = Config::load(Some(git.git_dir()))?;
    if cli.json || !config.color() || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let options = AnalyzeOptions {
        auto_refresh: !cli.no_fetch && config.auto_fetch(),
        merge_scan_limit: config.merge_scan_limit(),
    };

    let report = analyzer::analyze_repo(&git, &target, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    for warning in &report.warnings {
        output::warn(warning, verbosity);
    }

    if verbosity == Verbosity::Quiet {
        ui::render::render_quiet(&report);
    } else {
        ui::render::render(&report, verbosity == Verbosity::Verbose);
    }

    Ok(())
}

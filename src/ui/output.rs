//! ui::output
//!
//! Output plumbing shared by the CLI layer.
//!
//! # Design
//!
//! Messages respect the quiet flag; errors are always shown. The report
//! renderer itself lives in [`crate::ui::render`].

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - a single verdict line
    Quiet,
    /// Normal mode - the full report
    Normal,
    /// Verbose mode - the report plus scanned merge history
    Verbose,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

//! Command-line argument definitions for the Stormport CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input path, the target model store,
//! the run mode, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Stormport diagram importer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Diagram file, or directory containing diagram files
    #[arg(help = "Path to a diagram file or a directory of diagram files")]
    pub input: String,

    /// Path to the JSON model store the elements are imported into
    #[arg(short, long)]
    pub model: String,

    /// Validate shape colors only; never write to the model store
    #[arg(long)]
    pub check_colors: bool,

    /// Write a CSV report of disallowed colors next to each offending file
    #[arg(long)]
    pub report: bool,

    /// Write migrated legacy colors back into the diagram files
    #[arg(long)]
    pub fix_colors: bool,

    /// Run the full translation but discard all model store writes
    #[arg(long)]
    pub dry_run: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

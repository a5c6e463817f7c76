//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Daily work-time logger.
///
/// Resolves the day's recurring meetings from configuration, lays the workday
/// out as contiguous time entries, and submits them to the tracker.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Day-selection flags shared by `plan` and `log`.
#[derive(Debug, Args)]
pub struct DayArgs {
    /// Date to log for (YYYY-MM-DD); defaults to today in the configured
    /// timezone.
    #[arg(short, long)]
    pub when: Option<String>,

    /// Add an ad-hoc meeting after the regular ones. Format: "title:minutes".
    #[arg(short, long)]
    pub meeting: Option<String>,

    /// Disregard the regular meetings and use this one instead.
    /// Format: "title:minutes".
    #[arg(short, long)]
    pub override_meeting: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview the day's entries without touching the network.
    Plan {
        #[command(flatten)]
        day: DayArgs,
    },

    /// Build the day's entries and submit them to the tracker.
    Log {
        #[command(flatten)]
        day: DayArgs,

        /// Submit without asking for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

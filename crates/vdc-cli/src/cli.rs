//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vdc_core::AmbiguityPolicy;

/// Video duration calculator.
///
/// Adds up pasted timestamps or the durations of video files under a folder
/// and shows how long the total takes at common playback speeds.
#[derive(Debug, Parser)]
#[command(name = "vdc", version, about, long_about = None)]
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

/// Available subcommands. Without one, an interactive menu is shown.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Paste timestamps line by line; type `calc` to finish, `undo` to drop the last entry.
    Manual {
        /// How to read two-part times like `10:30`. Prompts when omitted.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Output the report as JSON (progress goes to stderr).
        #[arg(long)]
        json: bool,
    },

    /// Sum the durations of all video files under a folder.
    Scan {
        /// Folder to scan recursively.
        path: PathBuf,

        /// Output the report as JSON (progress goes to stderr).
        #[arg(long)]
        json: bool,
    },
}

/// Command-line spelling of [`AmbiguityPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// `10:30` is ten minutes thirty seconds.
    #[value(alias = "ms")]
    MinutesSeconds,
    /// `10:30` is ten hours thirty minutes.
    #[value(alias = "hm")]
    HoursMinutes,
}

impl From<PolicyArg> for AmbiguityPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::MinutesSeconds => Self::MinutesSeconds,
            PolicyArg::HoursMinutes => Self::HoursMinutes,
        }
    }
}

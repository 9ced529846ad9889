//! Core domain logic for the video duration calculator.
//!
//! This crate contains:
//! - Parsing: turning pasted timestamp tokens into seconds
//! - Accumulation: the undo-capable paste session
//! - Scanning: summing probed durations of video files under a directory
//! - Reporting: rescaling a total across playback speeds

pub mod accumulator;
pub mod parse;
pub mod probe;
pub mod report;
pub mod scan;

pub use accumulator::{Accumulator, Command, SessionEvent, SessionResult, Termination};
pub use parse::{AmbiguityPolicy, parse_duration};
pub use probe::{DurationProbe, FfprobeProbe, ProbeError};
pub use report::{SpeedRow, Totals, format_clock, format_seconds, speed_table};
pub use scan::{ScanError, ScanEvent, ScanSummary, VIDEO_EXTENSIONS, scan_directory};

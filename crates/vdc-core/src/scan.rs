//! Recursive directory scanning for video files.
//!
//! Files are visited sequentially in file-name order. A file whose duration
//! cannot be read is reported and skipped. Once the root exists the scan runs
//! to completion unless the event callback breaks out of it.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::probe::DurationProbe;

/// Recognised video file extensions (matched case-insensitively).
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mkv", ".avi", ".mov", ".flv", ".wmv", ".m4v", ".ts", ".webm",
];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Progress of a directory scan, one event per recognised file.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A file's duration was read.
    Found {
        /// 1-based count of files read so far.
        index: usize,
        file_name: String,
        path: PathBuf,
        seconds: f64,
    },
    /// A file's duration could not be read; it was skipped.
    Failed {
        file_name: String,
        path: PathBuf,
        reason: String,
    },
}

/// Totals of a finished scan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScanSummary {
    pub total_seconds: f64,
    /// Files whose duration was read.
    pub count: usize,
    /// Recognised files that could not be read.
    pub failed: usize,
    /// The callback stopped the scan before every file was visited.
    pub stopped: bool,
}

/// Returns true if the file name carries a recognised video extension.
pub fn is_video_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Scans `root` recursively, probing every video file.
///
/// `on_event` is called once per recognised file, in visit order. Returning
/// [`ControlFlow::Break`] ends the scan with the totals gathered so far.
pub fn scan_directory<P, F>(root: &Path, probe: &P, mut on_event: F) -> Result<ScanSummary, ScanError>
where
    P: DurationProbe + ?Sized,
    F: FnMut(&ScanEvent) -> ControlFlow<()>,
{
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }

    let mut summary = ScanSummary::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !path.is_file() || !is_video_file(&file_name) {
            continue;
        }

        let event = match probe.probe(path) {
            Ok(seconds) => {
                summary.total_seconds += seconds;
                summary.count += 1;
                tracing::debug!(path = %path.display(), seconds, "probed video");
                ScanEvent::Found {
                    index: summary.count,
                    file_name,
                    path: path.to_path_buf(),
                    seconds,
                }
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(path = %path.display(), error = %e, "failed to read duration");
                ScanEvent::Failed {
                    file_name,
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        };
        if on_event(&event).is_break() {
            tracing::debug!(count = summary.count, "scan stopped early");
            summary.stopped = true;
            break;
        }
    }

    Ok(summary)
}

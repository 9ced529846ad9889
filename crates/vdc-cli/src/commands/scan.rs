//! Directory scan mode: sum the durations of every video file under a folder.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::Result;
use vdc_core::{
    DurationProbe, FfprobeProbe, ScanError, ScanEvent, Totals, format_seconds, scan_directory,
};

use crate::Config;

const DIVIDER: &str = "------------------------------------------------------------";

/// Scans `raw_path` with ffprobe and returns the totals.
///
/// A missing path is reported and yields empty totals. `should_stop` is
/// polled after each file; once it returns true the scan ends with what it
/// has read so far.
pub fn collect<W, S>(
    writer: &mut W,
    config: &Config,
    raw_path: &OsStr,
    should_stop: S,
) -> Result<Totals>
where
    W: Write,
    S: FnMut() -> bool,
{
    let probe = FfprobeProbe::new(&config.ffprobe_path);
    tracing::debug!(ffprobe = %probe.program().display(), "probing with ffprobe");
    collect_with(writer, &probe, raw_path, should_stop)
}

/// Scans `raw_path` using the given probe.
pub fn collect_with<W, P, S>(
    writer: &mut W,
    probe: &P,
    raw_path: &OsStr,
    mut should_stop: S,
) -> Result<Totals>
where
    W: Write,
    P: DurationProbe + ?Sized,
    S: FnMut() -> bool,
{
    let path = clean_path(raw_path);
    writeln!(writer, "MODE: Directory Scan")?;
    writeln!(writer)?;
    writeln!(writer, "Scanning {}...", path.display())?;
    writeln!(writer, "{DIVIDER}")?;

    let mut write_result = Ok(());
    let scanned = scan_directory(&path, probe, |event| {
        if write_result.is_ok() {
            write_result = render_event(writer, event);
        }
        if should_stop() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    match scanned {
        Ok(summary) => {
            write_result?;
            if summary.stopped {
                writeln!(writer)?;
                writeln!(writer, "[!] Scan interrupted, keeping {} file(s).", summary.count)?;
            }
            tracing::debug!(
                count = summary.count,
                failed = summary.failed,
                total_seconds = summary.total_seconds,
                "scan finished"
            );
            Ok(summary.into())
        }
        Err(ScanError::NotFound(path)) => {
            writeln!(writer)?;
            writeln!(writer, "[!] Error: Path not found: {}", path.display())?;
            Ok(Totals::default())
        }
    }
}

/// Strips whitespace and the quotes file managers add when copying paths.
///
/// Paths that are not valid UTF-8 are used as given.
fn clean_path(raw: &OsStr) -> PathBuf {
    raw.to_str().map_or_else(
        || PathBuf::from(raw),
        |raw| PathBuf::from(raw.trim().replace('"', "")),
    )
}

fn render_event<W: Write>(writer: &mut W, event: &ScanEvent) -> io::Result<()> {
    match event {
        ScanEvent::Found {
            index,
            file_name,
            seconds,
            ..
        } => {
            writeln!(writer, "[#{index:02}] {file_name}")?;
            writeln!(writer, "      Duration: {}", format_seconds(*seconds))?;
        }
        ScanEvent::Failed { file_name, .. } => {
            writeln!(writer, "[!] Failed to read: {file_name}")?;
        }
    }
    writer.flush()
}

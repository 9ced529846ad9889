//! Media duration probing.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("probe exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("unusable duration output: {0:?}")]
    InvalidOutput(String),
}

/// Reads the playback duration of a media file.
///
/// Implemented for closures so tests can substitute canned durations.
pub trait DurationProbe {
    /// Returns the duration of the file at `path` in seconds.
    fn probe(&self, path: &Path) -> Result<f64, ProbeError>;
}

impl<F> DurationProbe for F
where
    F: Fn(&Path) -> Result<f64, ProbeError>,
{
    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        self(path)
    }
}

/// Probes durations by shelling out to `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    program: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl FfprobeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<f64, ProbeError> {
        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses the bare `format=duration` value printed by ffprobe.
///
/// Containers without a known duration print `N/A`.
fn parse_probe_output(stdout: &str) -> Result<f64, ProbeError> {
    let value = stdout.trim();
    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(ProbeError::InvalidOutput(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_duration() {
        assert!((parse_probe_output("125.480000\n").unwrap() - 125.48).abs() < f64::EPSILON);
        assert!(parse_probe_output("0").unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_unknown_or_invalid_durations() {
        for output in ["N/A\n", "", "-3.0", "inf", "NaN"] {
            let err = parse_probe_output(output).unwrap_err();
            assert!(matches!(err, ProbeError::InvalidOutput(_)), "{output:?}");
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let probe = FfprobeProbe::new("/nonexistent/vdc-test/ffprobe");
        let err = probe.probe(Path::new("video.mp4")).unwrap_err();
        assert!(matches!(err, ProbeError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/vdc-test/ffprobe"));
    }

    #[test]
    fn closures_act_as_probes() {
        let probe = |path: &Path| -> Result<f64, ProbeError> {
            Ok(if path.ends_with("long.mkv") { 90.0 } else { 10.0 })
        };
        assert!((probe.probe(Path::new("a/long.mkv")).unwrap() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_program_is_ffprobe() {
        assert_eq!(FfprobeProbe::default().program(), Path::new("ffprobe"));
    }
}

//! Playback speed arithmetic and duration formatting.

use serde::Serialize;

use crate::accumulator::SessionResult;
use crate::scan::ScanSummary;

/// Speeds listed after normal playback, in display order.
pub const DEFAULT_SPEEDS: &[f64] = &[1.25, 1.5, 1.75, 2.0, 2.25, 2.5];

/// Speeds worth calling out in the report.
pub const DEFAULT_HIGHLIGHT_SPEEDS: &[f64] = &[1.5, 2.0, 2.5];

const SECONDS_PER_DAY: u64 = 86_400;

/// Total duration and item count handed to the report, from either producer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub total_seconds: f64,
    pub count: usize,
}

impl From<SessionResult> for Totals {
    #[allow(clippy::cast_precision_loss)]
    fn from(result: SessionResult) -> Self {
        Self {
            total_seconds: result.total_seconds as f64,
            count: result.count,
        }
    }
}

impl From<ScanSummary> for Totals {
    fn from(summary: ScanSummary) -> Self {
        Self {
            total_seconds: summary.total_seconds,
            count: summary.count,
        }
    }
}

/// Time required to watch the total at one playback speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedRow {
    pub speed: f64,
    pub seconds: f64,
    pub highlighted: bool,
}

impl SpeedRow {
    /// Row label, e.g. `1.25x Speed` or `Normal (1.0x)`.
    pub fn label(&self) -> String {
        if is_normal(self.speed) {
            "Normal (1.0x)".to_string()
        } else {
            format!("{}x Speed", format_speed(self.speed))
        }
    }
}

/// Builds the speed table: normal playback first, then each of `speeds`.
///
/// Non-positive speeds are ignored, and so is `1.0` since normal playback
/// always leads the table.
pub fn speed_table(total_seconds: f64, speeds: &[f64], highlight: &[f64]) -> Vec<SpeedRow> {
    let normal = SpeedRow {
        speed: 1.0,
        seconds: total_seconds,
        highlighted: false,
    };

    let scaled = speeds
        .iter()
        .filter(|&&speed| speed > 0.0 && !is_normal(speed))
        .map(|&speed| SpeedRow {
            speed,
            seconds: total_seconds / speed,
            highlighted: highlight.iter().any(|&h| (h - speed).abs() < f64::EPSILON),
        });

    std::iter::once(normal)
        .chain(scaled)
        .collect()
}

fn is_normal(speed: f64) -> bool {
    (speed - 1.0).abs() < f64::EPSILON
}

/// Renders a speed with at least one decimal place (`2` → `2.0`, `1.25` → `1.25`).
pub fn format_speed(speed: f64) -> String {
    if speed.fract() == 0.0 {
        format!("{speed:.1}")
    } else {
        format!("{speed}")
    }
}

/// Formats fractional seconds as `H:MM:SS`, see [`format_clock`].
///
/// Rounds half to even; negative and non-finite values render as `0:00:00`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_seconds(seconds: f64) -> String {
    let rounded = seconds.round_ties_even();
    if rounded.is_finite() && rounded > 0.0 {
        format_clock(rounded as u64)
    } else {
        format_clock(0)
    }
}

/// Formats whole seconds as `H:MM:SS`, prefixed with `N day(s), ` past 24 hours.
pub fn format_clock(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let rest = seconds % SECONDS_PER_DAY;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

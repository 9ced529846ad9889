//! Final report rendering.
//!
//! Shows the total of a manual session or directory scan rescaled across the
//! configured playback speeds, as a text table or JSON.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use vdc_core::report::format_speed;
use vdc_core::{SpeedRow, Totals, format_seconds, speed_table};

use crate::Config;

const THICK_DIVIDER: &str = "============================================================";
const TABLE_BORDER: &str = " +====================+====================+";
const TABLE_SEPARATOR: &str = " |--------------------+--------------------|";

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub totals: Totals,
    pub rows: Vec<SpeedRow>,
}

/// Builds report data for `totals` using the configured speeds.
pub fn generate_report_data(
    totals: Totals,
    config: &Config,
    generated_at: DateTime<Utc>,
) -> ReportData {
    ReportData {
        generated_at,
        totals,
        rows: speed_table(
            totals.total_seconds,
            &config.speeds,
            &config.highlight_speeds,
        ),
    }
}

// ========== Text Output ==========

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    if data.totals.count == 0 {
        writeln!(output).unwrap();
        writeln!(output, "[!] No valid items processed.").unwrap();
        return output;
    }

    writeln!(output, "{THICK_DIVIDER}").unwrap();
    writeln!(output, "{:>36}", "FINAL REPORT").unwrap();
    writeln!(output, "{THICK_DIVIDER}").unwrap();
    writeln!(output, " Total Items Processed: {}", data.totals.count).unwrap();
    writeln!(output).unwrap();

    writeln!(output, "{TABLE_BORDER}").unwrap();
    writeln!(output, " | {:<18} | {:<18} |", "PLAYBACK SPEED", "TIME REQUIRED").unwrap();
    writeln!(output, "{TABLE_BORDER}").unwrap();

    for (i, row) in data.rows.iter().enumerate() {
        let marker = if row.highlighted { " *" } else { "" };
        writeln!(
            output,
            " | {:<18} | {:<18} |{marker}",
            row.label(),
            format_seconds(row.seconds)
        )
        .unwrap();
        if i == 0 && data.rows.len() > 1 {
            writeln!(output, "{TABLE_SEPARATOR}").unwrap();
        }
    }
    writeln!(output, "{TABLE_BORDER}").unwrap();

    if data.rows.iter().any(|row| row.highlighted) {
        writeln!(output).unwrap();
        writeln!(output, " * recommended speeds").unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub total_seconds: f64,
    pub count: usize,
    pub speeds: Vec<JsonSpeed>,
}

#[derive(Debug, Serialize)]
pub struct JsonSpeed {
    pub speed: String,
    pub seconds: f64,
    pub formatted: String,
    pub highlighted: bool,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        total_seconds: data.totals.total_seconds,
        count: data.totals.count,
        speeds: data
            .rows
            .iter()
            .map(|row| JsonSpeed {
                speed: format_speed(row.speed),
                seconds: row.seconds,
                formatted: format_seconds(row.seconds),
                highlighted: row.highlighted,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Writes the report for `totals`.
pub fn run<W: Write>(writer: &mut W, totals: Totals, config: &Config, json: bool) -> Result<()> {
    let data = generate_report_data(totals, config, Utc::now());

    if json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insta::assert_snapshot;

    fn report_for(total_seconds: f64, count: usize) -> ReportData {
        generate_report_data(
            Totals {
                total_seconds,
                count,
            },
            &Config::default(),
            Utc.with_ymd_and_hms(2025, 1, 29, 16, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_report_default_speeds() {
        let output = format_report(&report_for(5400.0, 1));
        assert_snapshot!(output, @r"
        ============================================================
                                FINAL REPORT
        ============================================================
         Total Items Processed: 1

         +====================+====================+
         | PLAYBACK SPEED     | TIME REQUIRED      |
         +====================+====================+
         | Normal (1.0x)      | 1:30:00            |
         |--------------------+--------------------|
         | 1.25x Speed        | 1:12:00            |
         | 1.5x Speed         | 1:00:00            | *
         | 1.75x Speed        | 0:51:26            |
         | 2.0x Speed         | 0:45:00            | *
         | 2.25x Speed        | 0:40:00            |
         | 2.5x Speed         | 0:36:00            | *
         +====================+====================+

         * recommended speeds
        ");
    }

    #[test]
    fn test_report_empty() {
        let output = format_report(&report_for(0.0, 0));
        assert_eq!(output, "\n[!] No valid items processed.\n");
    }

    #[test]
    fn test_report_without_highlights_has_no_legend() {
        let config = Config {
            speeds: vec![2.0],
            highlight_speeds: vec![],
            ..Config::default()
        };
        let data = generate_report_data(
            Totals {
                total_seconds: 600.0,
                count: 3,
            },
            &config,
            Utc::now(),
        );

        let output = format_report(&data);
        assert!(output.contains(" Total Items Processed: 3"));
        assert!(output.contains(" | 2.0x Speed         | 0:05:00            |\n"));
        assert!(!output.contains("recommended"));
    }

    #[test]
    fn test_report_json_output() {
        let data = report_for(3600.0, 2);
        let json: serde_json::Value =
            serde_json::from_str(&format_report_json(&data).unwrap()).unwrap();

        assert_eq!(json["generated_at"], "2025-01-29T16:00:00+00:00");
        assert_eq!(json["total_seconds"], 3600.0);
        assert_eq!(json["count"], 2);

        let speeds = json["speeds"].as_array().unwrap();
        assert_eq!(speeds.len(), 7);
        assert_eq!(speeds[0]["speed"], "1.0");
        assert_eq!(speeds[0]["formatted"], "1:00:00");
        assert_eq!(speeds[4]["speed"], "2.0");
        assert_eq!(speeds[4]["seconds"], 1800.0);
        assert_eq!(speeds[4]["highlighted"], true);
    }

    #[test]
    fn test_run_writes_text_report() {
        let mut output = Vec::new();
        run(
            &mut output,
            Totals {
                total_seconds: 45.0,
                count: 1,
            },
            &Config::default(),
            false,
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("FINAL REPORT"));
        assert!(output.contains("| Normal (1.0x)      | 0:00:45            |"));
    }
}

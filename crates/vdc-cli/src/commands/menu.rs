//! Interactive main menu shown when no subcommand is given.

use std::ffi::OsStr;
use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::commands::{manual, report, scan};
use crate::console::{Console, Input};

const THICK_DIVIDER: &str = "============================================================";

/// Runs the menu loop until the user exits, interrupts, or input ends.
pub fn run<W: Write>(console: &mut Console, writer: &mut W, config: &Config) -> Result<()> {
    loop {
        print_banner(writer)?;
        writeln!(writer, "Select an option:")?;
        writeln!(writer)?;
        writeln!(writer, "  [1] Manual Input (Copy/Paste text)")?;
        writeln!(writer, "  [2] Scan Folder (Automatic)")?;
        writeln!(writer, "  [0] Exit")?;
        writeln!(writer)?;

        let choice = match console.prompt(writer, ">> Choice: ")? {
            Input::Line(choice) => choice,
            Input::Interrupted | Input::Closed => break,
        };

        match choice.trim() {
            "1" => {
                let totals = manual::collect(console, writer, config, None)?;
                report::run(writer, totals, config, false)?;
                pause(console, writer)?;
            }
            "2" => {
                let path = match console.prompt(writer, "[?] Enter folder path: ")? {
                    Input::Line(path) => path,
                    Input::Interrupted | Input::Closed => continue,
                };
                let totals =
                    scan::collect(writer, config, OsStr::new(&path), || console.take_interrupt())?;
                // Nothing worth a report: missing path, empty folder or unreadable files.
                if totals.total_seconds > 0.0 {
                    report::run(writer, totals, config, false)?;
                    pause(console, writer)?;
                }
            }
            "0" => break,
            other => tracing::debug!(choice = other, "ignoring unknown menu choice"),
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Exiting... Goodbye!")?;
    Ok(())
}

fn print_banner<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "{THICK_DIVIDER}")?;
    writeln!(writer, "      VIDEO DURATION CALCULATOR & TIME MANAGER")?;
    writeln!(writer, "{THICK_DIVIDER}")?;
    writeln!(writer)?;
    Ok(())
}

fn pause<W: Write>(console: &mut Console, writer: &mut W) -> Result<()> {
    writeln!(writer)?;
    console.prompt(writer, "Press Enter to return to main menu...")?;
    writeln!(writer)?;
    Ok(())
}

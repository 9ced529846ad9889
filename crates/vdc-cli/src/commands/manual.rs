//! Manual input mode: paste timestamps, undo mistakes, finish with `calc`.

use std::io::Write;

use anyhow::Result;
use vdc_core::{
    Accumulator, AmbiguityPolicy, SessionEvent, SessionResult, Termination, Totals, format_clock,
};

use crate::Config;
use crate::console::{Console, Input};

const DIVIDER: &str = "------------------------------------------------------------";

/// Runs a manual input session and returns its totals.
///
/// The policy comes from `policy`, then the config, then an interactive prompt.
pub fn collect<W: Write>(
    console: &mut Console,
    writer: &mut W,
    config: &Config,
    policy: Option<AmbiguityPolicy>,
) -> Result<Totals> {
    writeln!(writer, "MODE: Manual Input")?;

    let policy = match policy.or(config.policy) {
        Some(policy) => policy,
        None => select_policy(console, writer)?,
    };
    tracing::debug!(%policy, "starting manual session");

    writeln!(writer, "{DIVIDER}")?;
    writeln!(writer, "INSTRUCTIONS:")?;
    writeln!(writer, "1. Paste your list of times.")?;
    writeln!(writer, "2. Type 'undo' to remove last item.")?;
    writeln!(writer, "3. Type 'calc' on a new line to finish.")?;
    writeln!(writer, "{DIVIDER}")?;
    writeln!(writer, "Waiting for input...")?;
    writeln!(writer)?;
    writer.flush()?;

    let result = run_session(console, writer, policy)?;
    Ok(result.into())
}

/// Asks how two-part times should be read.
pub fn select_policy<W: Write>(console: &mut Console, writer: &mut W) -> Result<AmbiguityPolicy> {
    writeln!(writer)?;
    writeln!(writer, "[?] Configuration for 2-part times (e.g., '10:30'):")?;
    writeln!(writer, "    [1] Treat as MM:SS (Default)")?;
    writeln!(writer, "    [2] Treat as HH:MM")?;
    writeln!(writer)?;

    let policy = match console.prompt(writer, ">> Selection (default 1): ")? {
        Input::Line(selection) => AmbiguityPolicy::from_selection(&selection),
        Input::Interrupted | Input::Closed => {
            writeln!(writer)?;
            AmbiguityPolicy::default()
        }
    };
    Ok(policy)
}

/// Feeds console input to an [`Accumulator`] until the session ends.
///
/// An interrupt or end of input finishes the session with whatever was
/// recorded so far.
pub fn run_session<W: Write>(
    console: &mut Console,
    writer: &mut W,
    policy: AmbiguityPolicy,
) -> Result<SessionResult> {
    let mut accumulator = Accumulator::new(policy);

    while !accumulator.is_finished() {
        let events = match console.next_input() {
            Input::Line(line) => accumulator.process_line(&line),
            Input::Interrupted | Input::Closed => accumulator.cancel().into_iter().collect(),
        };
        for event in &events {
            render_event(writer, event)?;
        }
        writer.flush()?;
    }

    Ok(accumulator.finish())
}

/// Writes the user-facing line for a session event.
fn render_event<W: Write>(writer: &mut W, event: &SessionEvent) -> Result<()> {
    match event {
        SessionEvent::Added {
            token,
            seconds,
            index,
        } => writeln!(
            writer,
            "[#{index:02}] Added: {token} -> {}",
            format_clock(*seconds)
        )?,
        SessionEvent::Undone { removed } => {
            writeln!(writer, "   [-] Undo: Removed {}", format_clock(*removed))?;
        }
        SessionEvent::NothingToUndo => writeln!(writer, "   [!] Nothing to undo.")?,
        SessionEvent::Skipped { .. } | SessionEvent::Finished(Termination::Command) => {}
        SessionEvent::Finished(Termination::Cancelled) => {
            writeln!(writer)?;
            writeln!(writer, "Input ended, calculating...")?;
        }
    }
    Ok(())
}

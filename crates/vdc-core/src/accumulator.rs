//! Interactive accumulation of pasted timestamps with undo.
//!
//! An [`Accumulator`] owns the history of one session. Each input line is a
//! state transition that returns the [`SessionEvent`]s it produced, so the
//! caller decides how (and whether) to display them.
//!
//! # Line handling
//!
//! 1. Finish commands (`calc`, `done`, `exit`, `end`, `finish`) terminate the session.
//! 2. Undo commands (`undo`, `z`, `-`) remove the most recent entry.
//! 3. Anything else is scanned for timestamp-shaped substrings, each parsed
//!    with the session's [`AmbiguityPolicy`]. If nothing matches but the line
//!    still contains a colon, the whole line is parsed as one token.
//!
//! Commands are matched case-insensitively on the trimmed line; scanning uses
//! the line as received.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parse::{AmbiguityPolicy, parse_duration};

/// Timestamp shape: two or three digit groups separated by colons, with
/// optional whitespace around each colon.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+\s*:\s*[0-9]+(?:\s*:\s*[0-9]+)?").unwrap()
});

const FINISH_COMMANDS: &[&str] = &["calc", "done", "exit", "end", "finish"];
const UNDO_COMMANDS: &[&str] = &["undo", "z", "-"];

/// A control command recognised on an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Finish,
    Undo,
}

impl Command {
    /// Recognises a command, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn recognize(line: &str) -> Option<Self> {
        let normalized = line.trim().to_lowercase();
        if FINISH_COMMANDS.contains(&normalized.as_str()) {
            Some(Self::Finish)
        } else if UNDO_COMMANDS.contains(&normalized.as_str()) {
            Some(Self::Undo)
        } else {
            None
        }
    }
}

/// Why a session stopped collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A finish command was entered.
    Command,
    /// The session was interrupted or its input ended.
    Cancelled,
}

/// Observable outcome of processing a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token parsed to a positive duration and was appended.
    Added {
        /// The token as it appeared in the input.
        token: String,
        seconds: u64,
        /// 1-based position of the entry in the history.
        index: usize,
    },
    /// A timestamp-shaped token parsed to zero and was not recorded.
    Skipped { token: String },
    /// The most recent entry was removed.
    Undone { removed: u64 },
    /// Undo was requested on an empty history.
    NothingToUndo,
    /// The session stopped collecting.
    Finished(Termination),
}

/// Aggregate of a session's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionResult {
    /// Sum of all recorded durations, in seconds.
    pub total_seconds: u64,
    /// Number of recorded durations.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Collecting,
    Terminated(Termination),
}

/// Undo-capable accumulator for one interactive session.
#[derive(Debug, Clone)]
pub struct Accumulator {
    policy: AmbiguityPolicy,
    history: Vec<u64>,
    state: State,
}

impl Accumulator {
    /// Starts a new session with the given policy.
    #[must_use]
    pub const fn new(policy: AmbiguityPolicy) -> Self {
        Self {
            policy,
            history: Vec::new(),
            state: State::Collecting,
        }
    }

    /// Recorded durations in insertion order.
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    pub const fn is_finished(&self) -> bool {
        matches!(self.state, State::Terminated(_))
    }

    /// How the session ended, if it has.
    pub const fn termination(&self) -> Option<Termination> {
        match self.state {
            State::Collecting => None,
            State::Terminated(termination) => Some(termination),
        }
    }

    /// Processes one line of input and returns the events it produced.
    ///
    /// Lines received after termination are ignored.
    pub fn process_line(&mut self, line: &str) -> Vec<SessionEvent> {
        if self.is_finished() {
            return Vec::new();
        }

        match Command::recognize(line) {
            Some(Command::Finish) => {
                self.state = State::Terminated(Termination::Command);
                vec![SessionEvent::Finished(Termination::Command)]
            }
            Some(Command::Undo) => vec![self.undo()],
            None => self.scan_line(line),
        }
    }

    /// Removes the most recent entry.
    pub fn undo(&mut self) -> SessionEvent {
        match self.history.pop() {
            Some(removed) => {
                tracing::debug!(removed, remaining = self.history.len(), "undid entry");
                SessionEvent::Undone { removed }
            }
            None => {
                tracing::debug!("undo on empty history");
                SessionEvent::NothingToUndo
            }
        }
    }

    /// Ends the session without a finish command, keeping recorded history.
    ///
    /// Returns `None` if the session had already ended.
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        if self.is_finished() {
            return None;
        }
        self.state = State::Terminated(Termination::Cancelled);
        Some(SessionEvent::Finished(Termination::Cancelled))
    }

    /// Current aggregate of the history.
    pub fn result(&self) -> SessionResult {
        SessionResult {
            total_seconds: self.history.iter().fold(0, |acc, s| acc.saturating_add(*s)),
            count: self.history.len(),
        }
    }

    /// Consumes the session and returns its aggregate.
    pub fn finish(self) -> SessionResult {
        self.result()
    }

    fn scan_line(&mut self, line: &str) -> Vec<SessionEvent> {
        let tokens: Vec<&str> = TIMESTAMP_RE.find_iter(line).map(|m| m.as_str()).collect();

        if tokens.is_empty() {
            if line.contains(':') {
                return vec![self.record(line.trim(), line)];
            }
            return Vec::new();
        }

        tokens
            .into_iter()
            .map(|token| self.record(token, token))
            .collect()
    }

    /// Parses `source` and appends the result if positive, reporting it under `token`.
    fn record(&mut self, token: &str, source: &str) -> SessionEvent {
        let seconds = parse_duration(source, self.policy);
        if seconds == 0 {
            tracing::debug!(token, "skipped token without a usable duration");
            return SessionEvent::Skipped {
                token: token.to_string(),
            };
        }

        self.history.push(seconds);
        let index = self.history.len();
        tracing::debug!(token, seconds, index, "added entry");
        SessionEvent::Added {
            token: token.to_string(),
            seconds,
            index,
        }
    }
}

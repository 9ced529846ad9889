//! Line input for interactive sessions.
//!
//! Stdin is read on a helper thread and Ctrl-C is watched on another; both
//! feed a single channel so the session loop sees lines and interrupts in the
//! order they happened. Once input is exhausted every further read reports
//! [`Input::Closed`].
//!
//! An interrupt that arrives while nobody is waiting for input is held as
//! pending. Long-running work polls it with [`Console::take_interrupt`], and
//! otherwise the next read returns it.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use anyhow::Result;

/// One unit of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line of text, without its line terminator.
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Input ended (EOF or an unreadable stream).
    Closed,
}

#[derive(Debug, Default)]
struct GateState {
    waiting: bool,
    pending: bool,
}

/// Routes Ctrl-C either to a blocked reader or into a pending flag.
#[derive(Debug, Default)]
struct InterruptGate {
    state: Mutex<GateState>,
}

impl InterruptGate {
    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records an interrupt. Returns true if a reader is blocked and should
    /// receive it through the channel.
    fn on_interrupt(&self) -> bool {
        let mut state = self.lock();
        if state.waiting {
            true
        } else {
            state.pending = true;
            false
        }
    }

    /// Marks the start of a blocking read. Returns true if an interrupt was
    /// pending, in which case the read should not block.
    fn begin_wait(&self) -> bool {
        let mut state = self.lock();
        if std::mem::take(&mut state.pending) {
            true
        } else {
            state.waiting = true;
            false
        }
    }

    fn end_wait(&self) {
        self.lock().waiting = false;
    }

    fn take_pending(&self) -> bool {
        std::mem::take(&mut self.lock().pending)
    }
}

/// Source of interactive input.
pub struct Console {
    rx: Receiver<Input>,
    gate: Arc<InterruptGate>,
    closed: bool,
}

impl Console {
    /// Reads from stdin and listens for Ctrl-C.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel();

        let gate = Arc::new(InterruptGate::default());

        let lines_tx = tx.clone();
        thread::spawn(move || read_lines(io::stdin().lock(), &lines_tx));
        let watcher_gate = Arc::clone(&gate);
        thread::spawn(move || watch_interrupts(&tx, &watcher_gate));

        Self {
            rx,
            gate,
            closed: false,
        }
    }

    /// Replays fixed lines, then reports [`Input::Closed`].
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = mpsc::channel();
        for line in lines {
            // The receiver is alive until `rx` is returned.
            let _ = tx.send(Input::Line(line.into()));
        }
        Self {
            rx,
            gate: Arc::new(InterruptGate::default()),
            closed: false,
        }
    }

    /// Blocks until the next input is available.
    pub fn next_input(&mut self) -> Input {
        if self.gate.begin_wait() {
            return Input::Interrupted;
        }
        let received = if self.closed {
            Err(mpsc::RecvError)
        } else {
            self.rx.recv()
        };
        self.gate.end_wait();

        match received {
            Ok(Input::Closed) | Err(_) => {
                self.closed = true;
                Input::Closed
            }
            Ok(input) => input,
        }
    }

    /// Consumes an interrupt that arrived while no input was being read.
    pub fn take_interrupt(&self) -> bool {
        self.gate.take_pending()
    }

    /// Writes `message` without a newline, then waits for input.
    pub fn prompt<W: Write>(&mut self, writer: &mut W, message: &str) -> Result<Input> {
        write!(writer, "{message}")?;
        writer.flush()?;
        Ok(self.next_input())
    }
}

/// Forwards lines until EOF. Bytes that are not UTF-8 are replaced rather
/// than ending the stream.
fn read_lines<R: BufRead>(mut reader: R, tx: &Sender<Input>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading input");
                break;
            }
        }

        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let line = String::from_utf8_lossy(line).into_owned();
        if tx.send(Input::Line(line)).is_err() {
            return;
        }
    }
    let _ = tx.send(Input::Closed);
}

fn watch_interrupts(tx: &Sender<Input>, gate: &InterruptGate) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::warn!(error = %e, "Ctrl-C handling unavailable");
            return;
        }
    };

    runtime.block_on(async {
        while tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            if gate.on_interrupt() && tx.send(Input::Interrupted).is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_lines_then_stays_closed() {
        let mut console = Console::from_lines(["5:00", "calc"]);
        assert_eq!(console.next_input(), Input::Line("5:00".to_string()));
        assert_eq!(console.next_input(), Input::Line("calc".to_string()));
        assert_eq!(console.next_input(), Input::Closed);
        assert_eq!(console.next_input(), Input::Closed);
    }

    #[test]
    fn prompt_writes_message_before_reading() {
        let mut console = Console::from_lines(["2"]);
        let mut output = Vec::new();
        let input = console.prompt(&mut output, ">> Choice: ").unwrap();
        assert_eq!(input, Input::Line("2".to_string()));
        assert_eq!(String::from_utf8(output).unwrap(), ">> Choice: ");
    }

    #[test]
    fn reader_strips_line_endings_and_signals_close() {
        let (tx, rx) = mpsc::channel();
        read_lines(io::Cursor::new("10:30\r\nundo\n"), &tx);
        let received: Vec<Input> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                Input::Line("10:30".to_string()),
                Input::Line("undo".to_string()),
                Input::Closed,
            ]
        );
    }

    #[test]
    fn reader_keeps_going_after_invalid_utf8() {
        let (tx, rx) = mpsc::channel();
        read_lines(
            io::Cursor::new(&b"5:00\nLecture \x96 1:00\n2:00\ncalc\n"[..]),
            &tx,
        );
        let received: Vec<Input> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                Input::Line("5:00".to_string()),
                Input::Line("Lecture \u{FFFD} 1:00".to_string()),
                Input::Line("2:00".to_string()),
                Input::Line("calc".to_string()),
                Input::Closed,
            ]
        );
    }

    #[test]
    fn reader_forwards_last_line_without_newline() {
        let (tx, rx) = mpsc::channel();
        read_lines(io::Cursor::new("1:00\ndone"), &tx);
        let received: Vec<Input> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                Input::Line("1:00".to_string()),
                Input::Line("done".to_string()),
                Input::Closed,
            ]
        );
    }

    #[test]
    fn interrupt_while_busy_is_held_for_polling() {
        let console = Console::from_lines(["1"]);
        assert!(!console.gate.on_interrupt());
        assert!(console.take_interrupt());
        assert!(!console.take_interrupt());
    }

    #[test]
    fn pending_interrupt_is_returned_by_next_read() {
        let mut console = Console::from_lines(["1"]);
        assert!(!console.gate.on_interrupt());
        assert_eq!(console.next_input(), Input::Interrupted);
        assert_eq!(console.next_input(), Input::Line("1".to_string()));
        assert!(!console.take_interrupt());
    }
}

//! Stdin-based transport for piped input.
//!
//! A background thread performs the blocking reads and forwards complete
//! lines over a channel, so `poll()` never blocks the event loop. Works both
//! for streams that stay open (`producer | satcon`) and for finite input
//! (`cat messages.jsonl | satcon`).

use crate::model::error::InputError;
use std::io::{BufRead, BufReader, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

/// What the reader thread reports.
#[derive(Debug)]
enum ReaderEvent {
    Line(String),
    Eof,
    Failed(std::io::Error),
}

/// Non-blocking line source backed by a reader thread.
#[derive(Debug)]
pub struct StdinSource {
    rx: Receiver<ReaderEvent>,
    complete: bool,
}

impl StdinSource {
    /// Create a new StdinSource from the process stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal).
    /// This prevents the TUI from waiting on keyboard input when the user
    /// forgot to pipe data.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }

    /// Create a source reading from any reader.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(reader).lines() {
                let event = match line {
                    Ok(line) => ReaderEvent::Line(line),
                    Err(err) => ReaderEvent::Failed(err),
                };
                let failed = matches!(event, ReaderEvent::Failed(_));
                if tx.send(event).is_err() || failed {
                    return;
                }
            }
            let _ = tx.send(ReaderEvent::Eof);
        });
        Self {
            rx,
            complete: false,
        }
    }

    /// Drain every line received so far.
    ///
    /// Non-blocking: returns an empty vec when nothing new arrived.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the underlying read failed. The source is
    /// complete afterwards.
    pub fn poll(&mut self) -> Result<Vec<String>, InputError> {
        let mut lines = Vec::new();
        while !self.complete {
            match self.rx.try_recv() {
                Ok(ReaderEvent::Line(line)) => lines.push(line),
                Ok(ReaderEvent::Eof) | Err(TryRecvError::Disconnected) => {
                    debug!("stdin reached EOF");
                    self.complete = true;
                }
                Ok(ReaderEvent::Failed(err)) => {
                    self.complete = true;
                    return Err(InputError::Io(err));
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        Ok(lines)
    }

    /// Check if EOF has been reached (no more data will arrive).
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

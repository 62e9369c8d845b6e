use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::ops::command::{Envelope, parse_line};

/// Everything the run loop hears from the outside world
#[derive(Debug)]
pub enum SourceEvent {
    Command(Envelope),
    /// A line that is not a valid envelope
    Malformed { line: String, error: String },
    /// The command stream ended or failed
    Disconnected(String),
    SnapshotChanged,
    WatchError(String),
}

/// Read JSON-lines commands on a background thread. `"-"` reads stdin,
/// anything else is opened as a file. An interactive stdin belongs to the
/// keyboard, so no reader is started for it.
pub fn spawn_command_reader(
    commands: &str,
    tx: Sender<SourceEvent>,
) -> io::Result<Option<JoinHandle<()>>> {
    let reader: Box<dyn BufRead + Send> = if commands == "-" {
        if io::stdin().is_terminal() {
            log::info!("stdin is a terminal, not reading commands from it");
            return Ok(None);
        }
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(commands)?))
    };
    thread::Builder::new()
        .name("command-reader".into())
        .spawn(move || read_commands(reader, &tx))
        .map(Some)
}

/// Forward each command line until the stream ends or the receiver is gone
pub fn read_commands<R: BufRead>(reader: R, tx: &Sender<SourceEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                let _ = tx.send(SourceEvent::Disconnected(format!(
                    "command stream failed: {e}"
                )));
                return;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = match parse_line(trimmed) {
            Ok(envelope) => SourceEvent::Command(envelope),
            Err(e) => SourceEvent::Malformed {
                line: trimmed.to_string(),
                error: e.to_string(),
            },
        };
        if tx.send(event).is_err() {
            return;
        }
    }
    let _ = tx.send(SourceEvent::Disconnected("command stream closed".into()));
}

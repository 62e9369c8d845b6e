use serde::Deserialize;

use crate::model::Task;
use crate::view::TaskList;

/// One line of the command stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// Producer name. Missing means "trust it".
    #[serde(default)]
    pub source: Option<String>,
    /// Section id the command addresses
    #[serde(default)]
    pub id: String,
    /// Display name used when `add` creates the section
    #[serde(default)]
    pub username: Option<String>,
    pub body: Command,
}

/// The command body, keyed by `mode`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Command {
    Add {
        task: String,
        #[serde(default)]
        completed: bool,
        #[serde(default)]
        focused: bool,
    },
    Focus {
        index: i64,
    },
    Unfocus,
    Edit {
        index: i64,
        task: String,
    },
    Remove {
        index: i64,
    },
    Done {
        index: i64,
    },
    Undone {
        index: i64,
    },
    ClearDone,
    ClearMyDone,
    ClearNs,
    ClearAll,
    /// Remove a whole section, addressed by `body.id`
    AdminDelete {
        id: String,
    },
    #[serde(other)]
    Unknown,
}

/// What the host has to do after a command was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// Reload the authoritative snapshot
    Resync,
    Ignored,
}

pub fn parse_line(line: &str) -> Result<Envelope, serde_json::Error> {
    serde_json::from_str(line)
}

/// Apply one envelope to the task list.
pub fn dispatch(list: &mut TaskList, envelope: Envelope, source_name: &str) -> Dispatch {
    if let Some(source) = &envelope.source
        && source != source_name
    {
        log::debug!("ignoring command from source {:?}", source);
        return Dispatch::Ignored;
    }

    let id = envelope.id.as_str();
    let result = match envelope.body {
        Command::Add {
            task,
            completed,
            focused,
        } => {
            let task = Task {
                text: task,
                done: completed,
                focused,
            };
            list.add_task(id, task, envelope.username.as_deref());
            Dispatch::Applied
        }
        Command::Focus { index } => with_index(index, |i| {
            list.focus_task(id, i);
        }),
        Command::Unfocus => {
            list.unfocus_task(id);
            Dispatch::Applied
        }
        Command::Edit { index, task } => with_index(index, |i| {
            list.edit_task(id, i, task);
        }),
        Command::Remove { index } => with_index(index, |i| {
            list.remove_task(id, i);
        }),
        Command::Done { index } => with_index(index, |i| {
            list.done_task(id, i);
        }),
        Command::Undone { index } => with_index(index, |i| {
            list.undone_task(id, i);
        }),
        Command::ClearDone => {
            list.clear_done();
            Dispatch::Resync
        }
        Command::ClearMyDone => {
            list.clear_my_done(id);
            Dispatch::Applied
        }
        Command::ClearNs | Command::ClearAll => Dispatch::Resync,
        Command::AdminDelete { id } => {
            list.remove_section(&id);
            Dispatch::Applied
        }
        Command::Unknown => Dispatch::Ignored,
    };
    log::debug!("dispatched command for {:?}: {:?}", id, result);
    result
}

/// Negative indices never address a task
fn with_index(index: i64, f: impl FnOnce(usize)) -> Dispatch {
    match usize::try_from(index) {
        Ok(i) => {
            f(i);
            Dispatch::Applied
        }
        Err(_) => Dispatch::Ignored,
    }
}

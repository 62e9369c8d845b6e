use serde::{Deserialize, Serialize};

/// A single task row. Identity within a section is its index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task text as shown on screen
    pub text: String,
    /// Completed (rendered crossed out)
    #[serde(default)]
    pub done: bool,
    /// Currently being worked on (rendered highlighted)
    #[serde(default)]
    pub focused: bool,
}

impl Task {
    /// Create an open, unfocused task
    pub fn new(text: impl Into<String>) -> Self {
        Task {
            text: text.into(),
            done: false,
            focused: false,
        }
    }

    /// The done/focused composite used by the render tree
    pub fn class(&self) -> TaskClass {
        TaskClass {
            done: self.done,
            focused: self.focused,
        }
    }
}

/// The visual state of a task row. A change here triggers the highlight pulse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TaskClass {
    pub done: bool,
    pub focused: bool,
}

use serde::{Deserialize, Serialize};

use super::task::Task;

/// A keyed, titled group of tasks belonging to one external identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Stable key, externally assigned (e.g. a user id)
    pub id: String,
    /// Display name. Empty means no title row.
    #[serde(default)]
    pub title: String,
    /// Tasks in display order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Section {
    /// Create an empty section
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Section {
            id: id.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Builder-style helper for tests and fixtures
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}

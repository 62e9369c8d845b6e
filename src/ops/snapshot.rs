//! The authoritative board state: a JSON object keyed by user id, in
//! display order.
//!
//! ```json
//! {"u1":{"username":"Ann","tasks":[{"Name":"a","Completed":false,"Focused":false}]}}
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::{Section, Task};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserEntry {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub tasks: Vec<SnapshotTask>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotTask {
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub focused: bool,
}

/// User id to entry, keeping the file's key order
pub type Snapshot = IndexMap<String, UserEntry>;

pub fn parse(text: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(text)
}

/// Sections in snapshot order, ready for `TaskList::load`
pub fn to_sections(snapshot: &Snapshot) -> Vec<Section> {
    snapshot
        .iter()
        .map(|(id, user)| Section {
            id: id.clone(),
            title: user.username.clone(),
            tasks: user
                .tasks
                .iter()
                .map(|t| Task {
                    text: t.name.clone(),
                    done: t.completed,
                    focused: t.focused,
                })
                .collect(),
        })
        .collect()
}

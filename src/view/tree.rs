use std::collections::HashMap;

use crate::model::{Section, Task, TaskClass};

/// Stable identity of a node in a [`RenderTree`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// What a node renders as
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A section container. Its children are task nodes.
    Section { key: String, title: Option<String> },
    /// A task row with its class composite, text and `N.` label
    Task {
        class: TaskClass,
        text: String,
        label: String,
    },
}

/// Inline style written by transitions. `NATURAL` means no override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    /// Height override in rows; `None` = natural height
    pub height: Option<f32>,
    pub opacity: f32,
    /// Horizontal offset in columns
    pub offset_x: f32,
    pub scale: f32,
}

impl NodeStyle {
    pub const NATURAL: NodeStyle = NodeStyle {
        height: None,
        opacity: 1.0,
        offset_x: 0.0,
        scale: 1.0,
    };
}

impl Default for NodeStyle {
    fn default() -> Self {
        NodeStyle::NATURAL
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Exit transition in flight: still laid out, invisible to reconciliation
    pub leaving: bool,
    pub style: NodeStyle,
}

/// Retained render tree: an ordered list of section roots, each holding
/// task rows. This is the on-screen state the differ patches in place.
#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
    /// Bumped on every structural or attribute write (not on style writes)
    revision: u64,
}

/// The display label for a task at `index`
pub fn task_label(index: usize) -> String {
    format!("{}.", index + 1)
}

impl RenderTree {
    pub fn new() -> Self {
        RenderTree::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All root sections in order, including ones mid-exit
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Root sections that are not leaving
    pub fn live_roots(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(|n| !n.leaving))
            .collect()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Task children of a section that are not leaving, in order
    pub fn live_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.nodes.get(c).is_some_and(|n| !n.leaving))
            .collect()
    }

    pub fn section_key(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(&id).map(|n| &n.kind) {
            Some(NodeKind::Section { key, .. }) => Some(key),
            _ => None,
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                kind,
                parent: None,
                children: Vec::new(),
                leaving: false,
                style: NodeStyle::NATURAL,
            },
        );
        id
    }

    /// Create a detached task node
    pub fn create_task(&mut self, task: &Task, index: usize) -> NodeId {
        self.revision += 1;
        self.alloc(NodeKind::Task {
            class: task.class(),
            text: task.text.clone(),
            label: task_label(index),
        })
    }

    /// Create a detached section node with all of its task rows
    pub fn create_section(&mut self, section: &Section) -> NodeId {
        self.revision += 1;
        let title = (!section.title.is_empty()).then(|| section.title.clone());
        let id = self.alloc(NodeKind::Section {
            key: section.id.clone(),
            title,
        });
        for (i, task) in section.tasks.iter().enumerate() {
            let child = self.create_task(task, i);
            self.append_child(id, child);
        }
        id
    }

    /// Insert (or relocate) a root section before `before`, or at the end.
    /// Relocating keeps the node, its subtree and its style intact.
    pub fn insert_root(&mut self, node: NodeId, before: Option<NodeId>) {
        if !self.nodes.contains_key(&node) {
            return;
        }
        self.revision += 1;
        self.roots.retain(|r| *r != node);
        let pos = before
            .and_then(|b| self.roots.iter().position(|r| *r == b))
            .unwrap_or(self.roots.len());
        self.roots.insert(pos, node);
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(&child) {
            return;
        }
        let Some(p) = self.nodes.get_mut(&parent) else {
            return;
        };
        p.children.push(child);
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        self.revision += 1;
    }

    /// Replace everything with freshly created sections (no diff)
    pub fn mount(&mut self, sections: &[Section]) {
        self.clear();
        for section in sections {
            let id = self.create_section(section);
            self.roots.push(id);
        }
    }

    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.revision += 1;
        }
        self.nodes.clear();
        self.roots.clear();
    }

    /// Detach a node from its parent (or the root list) and drop its subtree
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(&node).map(|n| n.parent) else {
            return;
        };
        match parent {
            Some(p) => {
                if let Some(pn) = self.nodes.get_mut(&p) {
                    pn.children.retain(|c| *c != node);
                }
            }
            None => self.roots.retain(|r| *r != node),
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(&id) {
                stack.extend(n.children);
            }
        }
        self.revision += 1;
    }

    pub fn mark_leaving(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.leaving = true;
            self.revision += 1;
        }
    }

    pub fn set_task_class(&mut self, node: NodeId, new_class: TaskClass) {
        if let Some(Node {
            kind: NodeKind::Task { class, .. },
            ..
        }) = self.nodes.get_mut(&node)
        {
            *class = new_class;
            self.revision += 1;
        }
    }

    pub fn set_task_text(&mut self, node: NodeId, new_text: &str) {
        if let Some(Node {
            kind: NodeKind::Task { text, .. },
            ..
        }) = self.nodes.get_mut(&node)
        {
            *text = new_text.to_string();
            self.revision += 1;
        }
    }

    pub fn set_task_label(&mut self, node: NodeId, new_label: &str) {
        if let Some(Node {
            kind: NodeKind::Task { label, .. },
            ..
        }) = self.nodes.get_mut(&node)
        {
            *label = new_label.to_string();
            self.revision += 1;
        }
    }

    pub fn set_section_title(&mut self, node: NodeId, new_title: Option<String>) {
        if let Some(Node {
            kind: NodeKind::Section { title, .. },
            ..
        }) = self.nodes.get_mut(&node)
        {
            *title = new_title;
            self.revision += 1;
        }
    }

    pub fn style(&self, node: NodeId) -> NodeStyle {
        self.nodes.get(&node).map_or(NodeStyle::NATURAL, |n| n.style)
    }

    pub fn set_style(&mut self, node: NodeId, style: NodeStyle) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.style = style;
        }
    }

    /// Deep copy of the live nodes with fresh ids and natural styles.
    /// Used for the marquee clone.
    pub fn clone_live(&self) -> RenderTree {
        let mut out = RenderTree::new();
        for root in self.live_roots() {
            let Some(node) = self.nodes.get(&root) else {
                continue;
            };
            let section = out.alloc(node.kind.clone());
            for child in self.live_children(root) {
                if let Some(task) = self.nodes.get(&child) {
                    let copy = out.alloc(task.kind.clone());
                    out.append_child(section, copy);
                }
            }
            out.roots.push(section);
        }
        out
    }

    /// Read the live tree back as sections (labels are dropped)
    pub fn to_sections(&self) -> Vec<Section> {
        self.live_roots()
            .into_iter()
            .filter_map(|root| {
                let NodeKind::Section { key, title } = &self.nodes.get(&root)?.kind else {
                    return None;
                };
                let tasks = self
                    .live_children(root)
                    .into_iter()
                    .filter_map(|c| match &self.nodes.get(&c)?.kind {
                        NodeKind::Task { class, text, .. } => Some(Task {
                            text: text.clone(),
                            done: class.done,
                            focused: class.focused,
                        }),
                        NodeKind::Section { .. } => None,
                    })
                    .collect();
                Some(Section {
                    id: key.clone(),
                    title: title.clone().unwrap_or_default(),
                    tasks,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Section> {
        vec![
            Section::new("u1", "Ann").with_tasks(vec![Task::new("a"), Task::new("b")]),
            Section::new("u2", "").with_tasks(vec![Task::new("c")]),
        ]
    }

    #[test]
    fn test_mount_round_trips_sections() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        assert_eq!(tree.to_sections(), sample());
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_empty_title_has_no_title_row() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let second = tree.roots()[1];
        assert_eq!(
            tree.get(second).unwrap().kind,
            NodeKind::Section {
                key: "u2".into(),
                title: None
            }
        );
    }

    #[test]
    fn test_task_labels_are_one_based() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let first = tree.roots()[0];
        let labels: Vec<String> = tree
            .children(first)
            .iter()
            .map(|c| match &tree.get(*c).unwrap().kind {
                NodeKind::Task { label, .. } => label.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(labels, vec!["1.", "2."]);
    }

    #[test]
    fn test_insert_root_relocates_without_new_identity() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let (a, b) = (tree.roots()[0], tree.roots()[1]);
        tree.insert_root(b, Some(a));
        assert_eq!(tree.roots(), &[b, a]);
        assert_eq!(tree.section_key(b), Some("u2"));
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let first = tree.roots()[0];
        let child = tree.children(first)[0];
        tree.remove(first);
        assert!(!tree.contains(first));
        assert!(!tree.contains(child));
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_leaving_nodes_are_not_live() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let first = tree.roots()[0];
        let child = tree.children(first)[1];
        tree.mark_leaving(child);
        assert_eq!(tree.live_children(first).len(), 1);
        assert_eq!(tree.children(first).len(), 2);

        tree.mark_leaving(first);
        assert_eq!(tree.live_roots().len(), 1);
        assert_eq!(tree.roots().len(), 2);
    }

    #[test]
    fn test_clone_live_skips_leaving_and_resets_style() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let first = tree.roots()[0];
        let child = tree.children(first)[0];
        tree.set_style(
            first,
            NodeStyle {
                height: Some(0.0),
                opacity: 0.0,
                offset_x: -2.0,
                scale: 1.0,
            },
        );
        tree.mark_leaving(child);

        let copy = tree.clone_live();
        assert_eq!(copy.node_count(), 4);
        let copy_first = copy.roots()[0];
        assert_eq!(copy.style(copy_first), NodeStyle::NATURAL);
        assert_eq!(copy.to_sections()[0].tasks, vec![Task::new("b")]);
    }

    #[test]
    fn test_style_writes_do_not_bump_revision() {
        let mut tree = RenderTree::new();
        tree.mount(&sample());
        let rev = tree.revision();
        let first = tree.roots()[0];
        tree.set_style(first, NodeStyle::NATURAL);
        assert_eq!(tree.revision(), rev);
        tree.set_section_title(first, Some("Bob".into()));
        assert!(tree.revision() > rev);
    }
}

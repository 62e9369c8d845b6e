use crate::model::{LayoutConfig, TaskClass};

use super::tree::{NodeId, NodeKind, RenderTree};

/// Row metrics used for measuring the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Blank rows after each section
    pub section_gap: u16,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        LayoutMetrics { section_gap: 1 }
    }
}

impl From<&LayoutConfig> for LayoutMetrics {
    fn from(config: &LayoutConfig) -> Self {
        LayoutMetrics {
            section_gap: config.section_gap,
        }
    }
}

/// Height of a node ignoring its own height override, in rows.
/// A section measures its children at their rendered heights.
pub fn natural_height(tree: &RenderTree, node: NodeId, metrics: LayoutMetrics) -> f32 {
    let Some(n) = tree.get(node) else {
        return 0.0;
    };
    match &n.kind {
        NodeKind::Task { .. } => 1.0,
        NodeKind::Section { title, .. } => {
            let title_rows = if title.is_some() { 1.0 } else { 0.0 };
            let tasks: f32 = n
                .children
                .iter()
                .map(|c| rendered_height(tree, *c, metrics))
                .sum();
            title_rows + tasks + f32::from(metrics.section_gap)
        }
    }
}

/// Height as currently laid out: the override if a transition set one
pub fn rendered_height(tree: &RenderTree, node: NodeId, metrics: LayoutMetrics) -> f32 {
    match tree.get(node).and_then(|n| n.style.height) {
        Some(h) => h,
        None => natural_height(tree, node, metrics),
    }
}

/// Total height of the content, including nodes still collapsing.
pub fn content_height(tree: &RenderTree, metrics: LayoutMetrics) -> f32 {
    tree.roots()
        .iter()
        .map(|r| rendered_height(tree, *r, metrics))
        .sum()
}

/// What a single screen row shows
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Title(String),
    Task {
        label: String,
        text: String,
        class: TaskClass,
    },
    Gap,
}

/// One painted row with the effective transition style applied
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRow {
    pub kind: RowKind,
    pub opacity: f32,
    /// Horizontal offset in columns
    pub offset_x: f32,
    pub scale: f32,
}

/// Flatten the tree into screen rows. Nodes with a height override are
/// clipped to that many rows (overflow hidden).
pub fn visual_rows(tree: &RenderTree, metrics: LayoutMetrics) -> Vec<VisualRow> {
    let mut rows = Vec::new();
    for root in tree.roots() {
        let Some(section) = tree.get(*root) else {
            continue;
        };
        let NodeKind::Section { title, .. } = &section.kind else {
            continue;
        };
        let style = section.style;
        let mut section_rows = Vec::new();
        if let Some(t) = title {
            section_rows.push(VisualRow {
                kind: RowKind::Title(t.clone()),
                opacity: style.opacity,
                offset_x: style.offset_x,
                scale: style.scale,
            });
        }
        for child in &section.children {
            let Some(task) = tree.get(*child) else {
                continue;
            };
            let NodeKind::Task { class, text, label } = &task.kind else {
                continue;
            };
            let visible = task.style.height.map_or(1, clip_rows).min(1);
            if visible == 0 {
                continue;
            }
            section_rows.push(VisualRow {
                kind: RowKind::Task {
                    label: label.clone(),
                    text: text.clone(),
                    class: *class,
                },
                opacity: style.opacity * task.style.opacity,
                offset_x: style.offset_x + task.style.offset_x,
                scale: style.scale * task.style.scale,
            });
        }
        for _ in 0..metrics.section_gap {
            section_rows.push(VisualRow {
                kind: RowKind::Gap,
                opacity: style.opacity,
                offset_x: 0.0,
                scale: 1.0,
            });
        }
        if let Some(h) = style.height {
            section_rows.truncate(clip_rows(h));
        }
        rows.extend(section_rows);
    }
    rows
}

fn clip_rows(height: f32) -> usize {
    if height <= 0.0 {
        0
    } else {
        height.round() as usize
    }
}

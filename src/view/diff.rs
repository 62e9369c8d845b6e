//! Keyed section / positional task reconciliation.
//!
//! [`diff`] compares a render tree against a new list of sections and returns
//! the patch operations that bring the tree in line. It never touches the
//! tree; [`super::patcher::apply`] does. Sections are matched by key, tasks by
//! index. Nodes that are mid-exit are ignored: they are on their way out and
//! no longer correspond to anything in the model.

use std::collections::HashMap;

use crate::model::{Section, Task, TaskClass};

use super::tree::{NodeId, NodeKind, RenderTree, task_label};

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Build a new section subtree and insert it before `before` (or at the end)
    CreateSection {
        section: Section,
        before: Option<NodeId>,
        animate: bool,
    },
    /// Relocate an existing section, keeping its identity
    MoveSection {
        node: NodeId,
        before: Option<NodeId>,
    },
    RemoveSection {
        node: NodeId,
        animate: bool,
    },
    SetSectionTitle {
        node: NodeId,
        title: Option<String>,
    },
    SetTaskClass {
        node: NodeId,
        class: TaskClass,
        highlight: bool,
    },
    SetTaskText {
        node: NodeId,
        text: String,
    },
    SetTaskLabel {
        node: NodeId,
        label: String,
    },
    AppendTask {
        section: NodeId,
        task: Task,
        index: usize,
        animate: bool,
    },
    RemoveTask {
        node: NodeId,
        animate: bool,
    },
}

/// Compute the patches that turn `tree` into `sections`.
pub fn diff(tree: &RenderTree, sections: &[Section], animate: bool) -> Vec<Patch> {
    let mut patches = Vec::new();

    let mut order = tree.live_roots();
    let mut unmatched: HashMap<&str, NodeId> = HashMap::new();
    let mut duplicates = Vec::new();
    for id in &order {
        if let Some(key) = tree.section_key(*id) {
            if unmatched.contains_key(key) {
                duplicates.push(*id);
            } else {
                unmatched.insert(key, *id);
            }
        }
    }

    let mut cursor = 0usize;
    for section in sections {
        let before = order.get(cursor).copied();
        match unmatched.remove(section.id.as_str()) {
            Some(node) => {
                diff_title(tree, node, section, &mut patches);
                diff_tasks(tree, node, &section.tasks, animate, &mut patches);
                if before != Some(node) {
                    patches.push(Patch::MoveSection { node, before });
                    order.retain(|n| *n != node);
                    order.insert(cursor, node);
                }
                cursor += 1;
            }
            None => {
                // Inserted before the cursor node, which stays the cursor
                patches.push(Patch::CreateSection {
                    section: section.clone(),
                    before,
                    animate,
                });
            }
        }
    }

    let mut leftovers: Vec<NodeId> = unmatched.into_values().chain(duplicates).collect();
    leftovers.sort_by_key(|n| order.iter().position(|o| o == n));
    for node in leftovers {
        patches.push(Patch::RemoveSection { node, animate });
    }

    patches
}

fn diff_title(tree: &RenderTree, node: NodeId, section: &Section, patches: &mut Vec<Patch>) {
    let want = (!section.title.is_empty()).then(|| section.title.clone());
    if let Some(NodeKind::Section { title, .. }) = tree.get(node).map(|n| &n.kind)
        && *title != want
    {
        patches.push(Patch::SetSectionTitle { node, title: want });
    }
}

fn diff_tasks(
    tree: &RenderTree,
    section: NodeId,
    tasks: &[Task],
    animate: bool,
    patches: &mut Vec<Patch>,
) {
    let existing = tree.live_children(section);

    for (i, task) in tasks.iter().enumerate() {
        let Some(node) = existing.get(i).copied() else {
            patches.push(Patch::AppendTask {
                section,
                task: task.clone(),
                index: i,
                animate,
            });
            continue;
        };
        let Some(NodeKind::Task { class, text, label }) = tree.get(node).map(|n| &n.kind) else {
            continue;
        };
        let want_class = task.class();
        if *class != want_class {
            patches.push(Patch::SetTaskClass {
                node,
                class: want_class,
                highlight: animate,
            });
        }
        if *text != task.text {
            patches.push(Patch::SetTaskText {
                node,
                text: task.text.clone(),
            });
        }
        let want_label = task_label(i);
        if *label != want_label {
            patches.push(Patch::SetTaskLabel {
                node,
                label: want_label,
            });
        }
    }

    for node in existing.iter().skip(tasks.len()).rev() {
        patches.push(Patch::RemoveTask {
            node: *node,
            animate,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(id: &str, tasks: &[&str]) -> Section {
        Section::new(id, id.to_uppercase())
            .with_tasks(tasks.iter().map(|t| Task::new(*t)).collect())
    }

    fn mounted(sections: &[Section]) -> RenderTree {
        let mut tree = RenderTree::new();
        tree.mount(sections);
        tree
    }

    #[test]
    fn test_same_model_produces_no_patches() {
        let model = vec![section("a", &["1", "2"]), section("b", &["3"])];
        let tree = mounted(&model);
        assert_eq!(diff(&tree, &model, true), vec![]);
    }

    #[test]
    fn test_new_section_appended_at_end() {
        let tree = mounted(&[section("a", &["1"])]);
        let patches = diff(&tree, &[section("a", &["1"]), section("b", &["2"])], true);
        assert_eq!(
            patches,
            vec![Patch::CreateSection {
                section: section("b", &["2"]),
                before: None,
                animate: true,
            }]
        );
    }

    #[test]
    fn test_new_section_inserted_before_cursor() {
        let tree = mounted(&[section("a", &["1"])]);
        let first = tree.roots()[0];
        let patches = diff(&tree, &[section("z", &[]), section("a", &["1"])], false);
        assert_eq!(
            patches,
            vec![Patch::CreateSection {
                section: section("z", &[]),
                before: Some(first),
                animate: false,
            }]
        );
    }

    #[test]
    fn test_reorder_moves_instead_of_recreating() {
        let tree = mounted(&[section("a", &[]), section("b", &[]), section("c", &[])]);
        let (a, c) = (tree.roots()[0], tree.roots()[2]);
        let patches = diff(&tree, &[section("c", &[]), section("a", &[]), section("b", &[])], true);
        assert_eq!(
            patches,
            vec![Patch::MoveSection {
                node: c,
                before: Some(a),
            }]
        );
    }

    #[test]
    fn test_unconsumed_sections_removed_in_order() {
        let tree = mounted(&[section("a", &[]), section("b", &[]), section("c", &[])]);
        let (a, b, c) = (tree.roots()[0], tree.roots()[1], tree.roots()[2]);
        let patches = diff(&tree, &[section("b", &[])], true);
        assert_eq!(
            patches,
            vec![
                Patch::MoveSection {
                    node: b,
                    before: Some(a)
                },
                Patch::RemoveSection {
                    node: a,
                    animate: true
                },
                Patch::RemoveSection {
                    node: c,
                    animate: true
                },
            ]
        );
    }

    #[test]
    fn test_class_change_requests_highlight() {
        let tree = mounted(&[section("a", &["x"])]);
        let task = tree.children(tree.roots()[0])[0];
        let mut done = section("a", &["x"]);
        done.tasks[0].done = true;
        assert_eq!(
            diff(&tree, &[done.clone()], true),
            vec![Patch::SetTaskClass {
                node: task,
                class: TaskClass {
                    done: true,
                    focused: false
                },
                highlight: true,
            }]
        );
        // Clone trees are patched without animation
        assert!(matches!(
            diff(&tree, &[done], false)[0],
            Patch::SetTaskClass {
                highlight: false,
                ..
            }
        ));
    }

    #[test]
    fn test_positional_removal_shifts_text_and_trims_tail() {
        let tree = mounted(&[section("a", &["first", "second"])]);
        let tasks = tree.children(tree.roots()[0]).to_vec();
        let patches = diff(&tree, &[section("a", &["second"])], true);
        assert_eq!(
            patches,
            vec![
                Patch::SetTaskText {
                    node: tasks[0],
                    text: "second".into()
                },
                Patch::RemoveTask {
                    node: tasks[1],
                    animate: true
                },
            ]
        );
    }

    #[test]
    fn test_tasks_appended_with_index() {
        let tree = mounted(&[section("a", &["1"])]);
        let node = tree.roots()[0];
        let patches = diff(&tree, &[section("a", &["1", "2", "3"])], true);
        assert_eq!(patches.len(), 2);
        assert_eq!(
            patches[1],
            Patch::AppendTask {
                section: node,
                task: Task::new("3"),
                index: 2,
                animate: true,
            }
        );
    }

    #[test]
    fn test_tail_removals_run_backwards() {
        let tree = mounted(&[section("a", &["1", "2", "3"])]);
        let tasks = tree.children(tree.roots()[0]).to_vec();
        let patches = diff(&tree, &[section("a", &["1"])], true);
        assert_eq!(
            patches,
            vec![
                Patch::RemoveTask {
                    node: tasks[2],
                    animate: true
                },
                Patch::RemoveTask {
                    node: tasks[1],
                    animate: true
                },
            ]
        );
    }

    #[test]
    fn test_leaving_nodes_are_never_matched() {
        let mut tree = mounted(&[section("a", &["1", "2"])]);
        let node = tree.roots()[0];
        let second = tree.children(node)[1];
        tree.mark_leaving(second);

        // The leaving row does not count as index 1
        let patches = diff(&tree, &[section("a", &["1", "2"])], true);
        assert!(matches!(patches[..], [Patch::AppendTask { index: 1, .. }]));

        tree.mark_leaving(node);
        let patches = diff(&tree, &[section("a", &["1"])], true);
        assert!(matches!(
            patches[..],
            [Patch::CreateSection { before: None, .. }]
        ));
    }

    #[test]
    fn test_title_change_is_patched() {
        let tree = mounted(&[section("a", &[])]);
        let node = tree.roots()[0];
        let mut renamed = section("a", &[]);
        renamed.title = String::new();
        assert_eq!(
            diff(&tree, &[renamed], true),
            vec![Patch::SetSectionTitle { node, title: None }]
        );
    }
}

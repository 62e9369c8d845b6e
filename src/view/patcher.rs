use super::animator::Animator;
use super::diff::Patch;
use super::tree::RenderTree;

/// Apply patches in order. Without an animator (the marquee clone) every
/// patch is applied immediately and no transition is scheduled.
///
/// Returns the number of patches applied.
pub fn apply(
    tree: &mut RenderTree,
    patches: Vec<Patch>,
    mut animator: Option<&mut Animator>,
) -> usize {
    let count = patches.len();
    for patch in patches {
        match patch {
            Patch::CreateSection {
                section,
                before,
                animate,
            } => {
                let node = tree.create_section(&section);
                tree.insert_root(node, before);
                if animate && let Some(anim) = animator.as_deref_mut() {
                    anim.enter(tree, node);
                }
            }
            Patch::MoveSection { node, before } => tree.insert_root(node, before),
            Patch::RemoveSection { node, animate } | Patch::RemoveTask { node, animate } => {
                match animator.as_deref_mut() {
                    Some(anim) if animate => anim.exit(tree, node),
                    _ => tree.remove(node),
                }
            }
            Patch::SetSectionTitle { node, title } => tree.set_section_title(node, title),
            Patch::SetTaskClass {
                node,
                class,
                highlight,
            } => {
                tree.set_task_class(node, class);
                if highlight && let Some(anim) = animator.as_deref_mut() {
                    anim.highlight(tree, node);
                }
            }
            Patch::SetTaskText { node, text } => tree.set_task_text(node, &text),
            Patch::SetTaskLabel { node, label } => tree.set_task_label(node, &label),
            Patch::AppendTask {
                section,
                task,
                index,
                animate,
            } => {
                let node = tree.create_task(&task, index);
                tree.append_child(section, node);
                if animate && let Some(anim) = animator.as_deref_mut() {
                    anim.enter(tree, node);
                }
            }
        }
    }
    count
}

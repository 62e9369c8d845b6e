use std::time::Instant;

use crate::model::{Board, BoardConfig, Section, Task};

use super::animator::Animator;
use super::diff::diff;
use super::layout::{LayoutMetrics, VisualRow, content_height, visual_rows};
use super::marquee::{Marquee, ScrollState};
use super::patcher;
use super::tree::RenderTree;

/// Visible area handed to the engine by the host, in cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// The live task list: model, render tree, transitions and marquee.
///
/// Every mutation updates the model and runs at most one render pass. The
/// first render after construction (or [`TaskList::destroy`]) mounts the
/// tree wholesale; later renders reconcile it in place. Addressing an
/// unknown section or an out-of-range index is a silent no-op.
#[derive(Debug, Clone)]
pub struct TaskList {
    board: Board,
    content: RenderTree,
    animator: Animator,
    marquee: Marquee,
    metrics: LayoutMetrics,
    global_focus: bool,
    viewport: Option<Viewport>,
    mounted: bool,
}

impl TaskList {
    pub fn new(config: &BoardConfig) -> Self {
        let metrics = LayoutMetrics::from(&config.layout);
        TaskList {
            board: Board::default(),
            content: RenderTree::new(),
            animator: Animator::new(&config.animation, metrics),
            marquee: Marquee::new(&config.scroll),
            metrics,
            global_focus: config.focus.global,
            viewport: None,
            mounted: false,
        }
    }

    // -- mutations --

    /// Replace the whole model with a copy of `sections`
    pub fn load(&mut self, sections: &[Section]) -> &mut Self {
        self.board = Board::new(sections.to_vec());
        self.render();
        self
    }

    /// Append a section. An existing id keeps its position and takes the
    /// new title and tasks.
    pub fn add_section(&mut self, section: Section) -> &mut Self {
        match self.board.find_mut(&section.id) {
            Some(existing) => {
                existing.title = section.title;
                existing.tasks = section.tasks;
            }
            None => self.board.sections.push(section),
        }
        self.render();
        self
    }

    pub fn remove_section(&mut self, id: &str) -> &mut Self {
        if let Some(pos) = self.board.position(id) {
            self.board.sections.remove(pos);
            self.render();
        }
        self
    }

    /// Run `f` on one section, then re-render
    pub fn update_section(&mut self, id: &str, f: impl FnOnce(&mut Section)) -> &mut Self {
        if let Some(section) = self.board.find_mut(id) {
            f(section);
            self.render();
        }
        self
    }

    /// Append a task, creating the section first if needed. A new section
    /// is titled `title`, falling back to its id when missing or empty.
    pub fn add_task(&mut self, section_id: &str, task: Task, title: Option<&str>) -> &mut Self {
        if self.board.find(section_id).is_none() {
            let title = title.filter(|t| !t.is_empty()).unwrap_or(section_id);
            self.board.sections.push(Section::new(section_id, title));
        }
        if let Some(section) = self.board.find_mut(section_id) {
            section.tasks.push(task);
        }
        self.render();
        self
    }

    pub fn edit_task(
        &mut self,
        section_id: &str,
        index: usize,
        text: impl Into<String>,
    ) -> &mut Self {
        let text = text.into();
        self.with_task(section_id, index, |task| task.text = text)
    }

    /// Mark complete. A finished task is no longer focused.
    pub fn done_task(&mut self, section_id: &str, index: usize) -> &mut Self {
        self.with_task(section_id, index, |task| {
            task.done = true;
            task.focused = false;
        })
    }

    pub fn undone_task(&mut self, section_id: &str, index: usize) -> &mut Self {
        self.with_task(section_id, index, |task| task.done = false)
    }

    /// Focus one task, clearing the other focus in its section (or
    /// everywhere, with global focus).
    pub fn focus_task(&mut self, section_id: &str, index: usize) -> &mut Self {
        let in_range = self
            .board
            .find(section_id)
            .is_some_and(|s| index < s.tasks.len());
        if !in_range {
            return self;
        }
        for section in &mut self.board.sections {
            if self.global_focus || section.id == section_id {
                clear_focus(section);
            }
        }
        if let Some(task) = self
            .board
            .find_mut(section_id)
            .and_then(|s| s.tasks.get_mut(index))
        {
            task.focused = true;
        }
        self.render();
        self
    }

    pub fn unfocus_task(&mut self, section_id: &str) -> &mut Self {
        self.update_section(section_id, clear_focus)
    }

    pub fn remove_task(&mut self, section_id: &str, index: usize) -> &mut Self {
        let Some(section) = self.board.find_mut(section_id) else {
            return self;
        };
        if index >= section.tasks.len() {
            return self;
        }
        section.tasks.remove(index);
        self.prune_empty();
        self.render();
        self
    }

    /// Remove every completed task in every section
    pub fn clear_done(&mut self) -> &mut Self {
        for section in &mut self.board.sections {
            section.tasks.retain(|t| !t.done);
        }
        self.prune_empty();
        self.render();
        self
    }

    /// Remove the completed tasks of one section
    pub fn clear_my_done(&mut self, section_id: &str) -> &mut Self {
        let Some(section) = self.board.find_mut(section_id) else {
            return self;
        };
        section.tasks.retain(|t| !t.done);
        self.prune_empty();
        self.render();
        self
    }

    /// Halt the marquee, drop the render tree and the model. The next
    /// render mounts from scratch.
    pub fn destroy(&mut self) {
        self.marquee.force_stop();
        self.animator.clear();
        self.content.clear();
        self.board = Board::default();
        self.mounted = false;
        log::debug!("task list destroyed");
    }

    fn with_task(
        &mut self,
        section_id: &str,
        index: usize,
        f: impl FnOnce(&mut Task),
    ) -> &mut Self {
        let Some(task) = self
            .board
            .find_mut(section_id)
            .and_then(|s| s.tasks.get_mut(index))
        else {
            return self;
        };
        f(task);
        self.render();
        self
    }

    fn prune_empty(&mut self) {
        self.board.sections.retain(|s| !s.tasks.is_empty());
    }

    // -- reads --

    /// A copy of the model
    pub fn data(&self) -> Vec<Section> {
        self.board.sections.clone()
    }

    pub fn section_count(&self) -> usize {
        self.board.section_count()
    }

    pub fn task_count(&self) -> usize {
        self.board.task_count()
    }

    pub fn done_count(&self) -> usize {
        self.board.done_count()
    }

    pub fn content(&self) -> &RenderTree {
        &self.content
    }

    pub fn pending_exits(&self) -> usize {
        self.animator.pending_exits()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.marquee.state()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.marquee.offset()
    }

    pub fn content_height(&self) -> f32 {
        content_height(&self.content, self.metrics)
    }

    /// The scroll track: live content rows followed by the clone's rows
    pub fn visual_rows(&self) -> Vec<VisualRow> {
        let mut rows = visual_rows(&self.content, self.metrics);
        if let Some(clone) = self.marquee.clone_tree() {
            rows.extend(visual_rows(clone, self.metrics));
        }
        rows
    }

    // -- host hooks --

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == Some(viewport) {
            return;
        }
        log::debug!("viewport {}x{}", viewport.width, viewport.height);
        self.viewport = Some(viewport);
        if self.animator.pending_exits() == 0 {
            self.resync();
        }
    }

    /// Whether the host should keep delivering frames
    pub fn wants_frame(&self) -> bool {
        self.animator.is_animating() || self.marquee.wants_frame()
    }

    /// Advance transitions and the marquee to `now`
    pub fn frame(&mut self, now: Instant) {
        let outcome = self.animator.tick(&mut self.content, now);
        if outcome.wants_resync() && self.animator.pending_exits() == 0 {
            self.resync();
        }
        let height = content_height(&self.content, self.metrics);
        self.marquee.tick(now, height);
    }

    fn render(&mut self) {
        if self.mounted {
            let animate = self.animator.is_enabled();
            let patches = diff(&self.content, &self.board.sections, animate);
            let applied = patcher::apply(&mut self.content, patches, Some(&mut self.animator));
            log::debug!(
                "render: {} patches, {} exits in flight",
                applied,
                self.animator.pending_exits()
            );
        } else {
            self.content.mount(&self.board.sections);
            self.mounted = true;
            log::debug!("render: mounted {} sections", self.board.section_count());
        }
        if self.animator.pending_exits() == 0 {
            self.resync();
        }
    }

    fn resync(&mut self) {
        let Some(viewport) = self.viewport else {
            return;
        };
        let height = content_height(&self.content, self.metrics);
        self.marquee.resync(
            &self.content,
            &self.board.sections,
            height,
            f32::from(viewport.height),
        );
    }
}

fn clear_focus(section: &mut Section) {
    for task in &mut section.tasks {
        task.focused = false;
    }
}

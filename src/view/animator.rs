//! Enter, exit and update-highlight transitions on the render tree.
//!
//! Transitions are scheduled by the patcher and advanced by [`Animator::tick`]
//! once per frame. A transition starts on the first tick after it was
//! scheduled. Exits keep their node in the tree (marked `leaving`) until they
//! finish; the number still in flight is exposed as [`Animator::pending_exits`]
//! and content must not be measured for the scroller while it is nonzero.
//!
//! With animation disabled every transition degrades to its end state
//! immediately: entering nodes are left at natural style, highlights are
//! skipped and exiting nodes are detached synchronously.

use std::time::{Duration, Instant};

use crate::model::AnimationConfig;

use super::easing::{CubicBezier, EASE_OUT, EASE_OUT_QUINT};
use super::layout::{LayoutMetrics, natural_height, rendered_height};
use super::tree::{NodeId, NodeStyle, RenderTree};

/// Horizontal offset (columns) of a node at the hidden end of enter/exit
pub const HIDDEN_OFFSET: f32 = -2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Enter,
    Exit,
    Highlight,
}

/// Animated properties. `None` leaves the property alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Keyframe {
    height: Option<f32>,
    opacity: Option<f32>,
    offset_x: Option<f32>,
    scale: Option<f32>,
}

#[derive(Debug, Clone)]
struct Transition {
    node: NodeId,
    kind: TransitionKind,
    from: Keyframe,
    to: Keyframe,
    duration: Duration,
    easing: CubicBezier,
    started: Option<Instant>,
}

/// What completed during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub entered: usize,
    pub exited: usize,
    pub highlighted: usize,
    /// The last in-flight exit finished on this tick
    pub settled: bool,
}

impl TickOutcome {
    pub fn wants_resync(&self) -> bool {
        self.entered > 0 || self.settled
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    enabled: bool,
    duration: Duration,
    highlight_duration: Duration,
    metrics: LayoutMetrics,
    transitions: Vec<Transition>,
    pending_exits: usize,
}

impl Animator {
    pub fn new(config: &AnimationConfig, metrics: LayoutMetrics) -> Self {
        Animator {
            enabled: config.enabled,
            duration: config.duration(),
            highlight_duration: config.highlight_duration(),
            metrics,
            transitions: Vec::new(),
            pending_exits: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of exit transitions whose node is still in the tree
    pub fn pending_exits(&self) -> usize {
        self.pending_exits
    }

    pub fn is_animating(&self) -> bool {
        !self.transitions.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.transitions.len()
    }

    /// Kinds of transitions currently scheduled on `node`
    pub fn transitions_on(&self, node: NodeId) -> Vec<TransitionKind> {
        self.transitions
            .iter()
            .filter(|t| t.node == node)
            .map(|t| t.kind)
            .collect()
    }

    /// Grow a freshly inserted node from nothing to its natural height
    pub fn enter(&mut self, tree: &mut RenderTree, node: NodeId) {
        if !self.enabled || !tree.contains(node) {
            return;
        }
        // Measure before locking the height so the target is known
        let height = natural_height(tree, node, self.metrics);
        tree.set_style(
            node,
            NodeStyle {
                height: Some(0.0),
                opacity: 0.0,
                offset_x: HIDDEN_OFFSET,
                scale: 1.0,
            },
        );
        self.transitions.push(Transition {
            node,
            kind: TransitionKind::Enter,
            from: Keyframe {
                height: Some(0.0),
                opacity: Some(0.0),
                offset_x: Some(HIDDEN_OFFSET),
                scale: None,
            },
            to: Keyframe {
                height: Some(height),
                opacity: Some(1.0),
                offset_x: Some(0.0),
                scale: None,
            },
            duration: self.duration,
            easing: EASE_OUT_QUINT,
            started: None,
        });
    }

    /// Collapse a node and detach it when done
    pub fn exit(&mut self, tree: &mut RenderTree, node: NodeId) {
        let Some(current) = tree.get(node) else {
            return;
        };
        if current.leaving {
            return;
        }
        if !self.enabled {
            tree.remove(node);
            return;
        }

        let style = current.style;
        let height = rendered_height(tree, node, self.metrics);
        tree.mark_leaving(node);
        self.pending_exits += 1;
        // The exit takes over from whatever was running on this node
        self.transitions.retain(|t| t.node != node);
        self.transitions.push(Transition {
            node,
            kind: TransitionKind::Exit,
            from: Keyframe {
                height: Some(height),
                opacity: Some(style.opacity),
                offset_x: Some(style.offset_x),
                scale: None,
            },
            to: Keyframe {
                height: Some(0.0),
                opacity: Some(0.0),
                offset_x: Some(HIDDEN_OFFSET),
                scale: None,
            },
            duration: self.duration,
            easing: EASE_OUT_QUINT,
            started: None,
        });
    }

    /// Brief scale/opacity pulse on a state change. Layout is untouched.
    pub fn highlight(&mut self, tree: &RenderTree, node: NodeId) {
        if !self.enabled || !tree.contains(node) {
            return;
        }
        self.transitions
            .retain(|t| !(t.node == node && t.kind == TransitionKind::Highlight));
        self.transitions.push(Transition {
            node,
            kind: TransitionKind::Highlight,
            from: Keyframe {
                opacity: Some(0.5),
                scale: Some(0.98),
                ..Keyframe::default()
            },
            to: Keyframe {
                opacity: Some(1.0),
                scale: Some(1.0),
                ..Keyframe::default()
            },
            duration: self.highlight_duration,
            easing: EASE_OUT,
            started: None,
        });
    }

    /// Advance every transition to `now`, finishing the ones that are done.
    pub fn tick(&mut self, tree: &mut RenderTree, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let transitions = std::mem::take(&mut self.transitions);
        let mut remaining = Vec::with_capacity(transitions.len());

        for mut tr in transitions {
            let started = *tr.started.get_or_insert(now);
            let progress = if tr.duration.is_zero() {
                1.0
            } else {
                now.saturating_duration_since(started).as_secs_f32() / tr.duration.as_secs_f32()
            };

            if progress < 1.0 {
                let eased = tr.easing.apply(progress);
                let style = interpolate(tree.style(tr.node), &tr.from, &tr.to, eased);
                tree.set_style(tr.node, style);
                remaining.push(tr);
                continue;
            }

            match tr.kind {
                TransitionKind::Enter => {
                    tree.set_style(tr.node, NodeStyle::NATURAL);
                    outcome.entered += 1;
                }
                TransitionKind::Exit => {
                    tree.remove(tr.node);
                    self.pending_exits = self.pending_exits.saturating_sub(1);
                    outcome.exited += 1;
                    if self.pending_exits == 0 {
                        outcome.settled = true;
                    }
                }
                TransitionKind::Highlight => {
                    let style = NodeStyle {
                        opacity: 1.0,
                        scale: 1.0,
                        ..tree.style(tr.node)
                    };
                    tree.set_style(tr.node, style);
                    outcome.highlighted += 1;
                }
            }
        }

        self.transitions = remaining;
        outcome
    }

    /// Drop every transition. Only valid when the tree is being cleared too.
    pub fn clear(&mut self) {
        self.transitions.clear();
        self.pending_exits = 0;
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn interpolate(base: NodeStyle, from: &Keyframe, to: &Keyframe, t: f32) -> NodeStyle {
    let mix = |a: Option<f32>, b: Option<f32>| match (a, b) {
        (Some(a), Some(b)) => Some(lerp(a, b, t)),
        _ => None,
    };
    NodeStyle {
        height: mix(from.height, to.height).or(base.height),
        opacity: mix(from.opacity, to.opacity).unwrap_or(base.opacity),
        offset_x: mix(from.offset_x, to.offset_x).unwrap_or(base.offset_x),
        scale: mix(from.scale, to.scale).unwrap_or(base.scale),
    }
}

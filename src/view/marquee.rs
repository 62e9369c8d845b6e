//! Continuous vertical auto-scroll for content taller than its viewport.
//!
//! The scroll track holds the live content followed by a clone of it. The
//! offset advances at a fixed speed and wraps by the content height, so the
//! clone makes the loop seamless. The clone is re-patched (never rebuilt)
//! whenever the model changes so the looping copy is never stale.
//!
//! States:
//!
//! - `Idle`: no motion, no clone, no frame requested
//! - `Scrolling`: advancing every frame
//! - `StoppingWait`: content fits again; keep moving until the next wrap,
//!   then stop, reset the offset and drop the clone

use std::time::{Duration, Instant};

use crate::model::{ScrollConfig, Section};

use super::diff::diff;
use super::patcher;
use super::tree::RenderTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Scrolling,
    StoppingWait,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Not running
    Idle,
    /// Clock (re)established or the frame delta was discarded
    Skipped,
    Advanced,
    Wrapped,
    /// Wrapped while waiting to stop; now idle
    Stopped,
}

#[derive(Debug, Clone)]
pub struct Marquee {
    state: ScrollState,
    /// Rows scrolled past the top of the track
    offset: f32,
    content_height: f32,
    viewport_height: f32,
    /// Rows per second
    speed: f32,
    max_frame_delta: Duration,
    last_frame: Option<Instant>,
    frame_requested: bool,
    clone: Option<RenderTree>,
}

impl Marquee {
    pub fn new(config: &ScrollConfig) -> Self {
        let speed = config.effective_speed();
        if speed != config.speed {
            log::warn!("invalid marquee speed {}, using {speed}", config.speed);
        }
        Marquee {
            state: ScrollState::Idle,
            offset: 0.0,
            content_height: 0.0,
            viewport_height: 0.0,
            speed,
            max_frame_delta: config.max_frame_delta(),
            last_frame: None,
            frame_requested: false,
            clone: None,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ScrollState::Idle
    }

    /// Whether the host should keep delivering frames
    pub fn wants_frame(&self) -> bool {
        self.frame_requested
    }

    /// The translation applied to the track, in rows (0 when idle)
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// The looping copy appended after the live content
    pub fn clone_tree(&self) -> Option<&RenderTree> {
        self.clone.as_ref()
    }

    /// Reconcile activation with the current measurements and model.
    /// Must only be called when no exit transition is in flight.
    pub fn resync(
        &mut self,
        content: &RenderTree,
        sections: &[Section],
        content_height: f32,
        viewport_height: f32,
    ) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        if content_height > viewport_height {
            match self.clone.as_mut() {
                Some(clone) => patch_clone(clone, sections),
                None => self.clone = Some(content.clone_live()),
            }
            if self.offset >= content_height {
                self.offset %= content_height;
            }
            self.start();
        } else if self.is_active() {
            if let Some(clone) = self.clone.as_mut() {
                patch_clone(clone, sections);
            }
            self.request_stop();
        } else {
            self.clone = None;
        }
    }

    fn start(&mut self) {
        match self.state {
            ScrollState::Scrolling => {}
            ScrollState::StoppingWait => {
                log::debug!("marquee: stop cancelled, content overflows again");
                self.state = ScrollState::Scrolling;
            }
            ScrollState::Idle => {
                log::debug!(
                    "marquee: start ({:.1} rows in {:.1} row viewport)",
                    self.content_height,
                    self.viewport_height
                );
                self.state = ScrollState::Scrolling;
                self.last_frame = None;
                self.frame_requested = true;
            }
        }
    }

    fn request_stop(&mut self) {
        if self.state == ScrollState::Scrolling {
            log::debug!("marquee: content fits, stopping at next wrap");
            self.state = ScrollState::StoppingWait;
        }
    }

    /// Stop immediately: cancel the frame request, reset the offset and
    /// drop the clone.
    pub fn force_stop(&mut self) {
        if self.is_active() {
            log::debug!("marquee: stopped");
        }
        self.state = ScrollState::Idle;
        self.frame_requested = false;
        self.last_frame = None;
        self.offset = 0.0;
        self.clone = None;
    }

    /// Advance by the time since the previous frame. `content_height` is the
    /// current measurement of the live content.
    pub fn tick(&mut self, now: Instant, content_height: f32) -> TickResult {
        if !self.frame_requested || self.state == ScrollState::Idle {
            return TickResult::Idle;
        }
        let Some(last) = self.last_frame.replace(now) else {
            return TickResult::Skipped;
        };
        let dt = now.saturating_duration_since(last);
        if dt >= self.max_frame_delta {
            // Resumed after a stall; jumping would be visible
            return TickResult::Skipped;
        }

        self.content_height = content_height;
        self.offset += self.speed * dt.as_secs_f32();

        if content_height > 0.0 && self.offset >= content_height {
            self.offset -= content_height;
            if self.state == ScrollState::StoppingWait {
                self.force_stop();
                return TickResult::Stopped;
            }
            return TickResult::Wrapped;
        }
        TickResult::Advanced
    }
}

fn patch_clone(clone: &mut RenderTree, sections: &[Section]) {
    let patches = diff(clone, sections, false);
    patcher::apply(clone, patches, None);
}

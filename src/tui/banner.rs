use std::time::{Duration, Instant};

/// Fade-out length once the hold time is over
pub const FADE: Duration = Duration::from_millis(300);

/// A transient message shown across the top of the board
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub message: String,
    shown_at: Instant,
    hold: Duration,
}

impl Banner {
    pub fn new(message: impl Into<String>, now: Instant, hold: Duration) -> Self {
        Banner {
            message: message.into(),
            shown_at: now,
            hold,
        }
    }

    /// Current opacity, or `None` once the banner has fully faded
    pub fn opacity(&self, now: Instant) -> Option<f32> {
        let age = now.saturating_duration_since(self.shown_at);
        if age < self.hold {
            return Some(1.0);
        }
        let fading = age - self.hold;
        if fading >= FADE {
            return None;
        }
        Some(1.0 - fading.as_secs_f32() / FADE.as_secs_f32())
    }

    pub fn is_fading(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.hold && self.opacity(now).is_some()
    }
}

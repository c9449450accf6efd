//! Multi-click step counter for wall-switch buttons.

use std::time::{Duration, Instant};

/// Debounce window: clicks closer together than this count up the step.
pub const STEP_WINDOW: Duration = Duration::from_millis(2000);

/// Per-channel click step counter.
///
/// Each click either continues the current burst (previous click less than
/// [`STEP_WINDOW`] ago) or starts a new one. The returned step lets a
/// listener treat "third press in a row" differently from a fresh press.
///
/// Time is passed in rather than read here, so the window is testable
/// without sleeping.
#[derive(Debug, Clone, Default)]
pub struct MultiClick {
    step: u32,
    last_click: Option<Instant>,
}

impl MultiClick {
    /// Record a click at `now` and return the resulting step (1-based).
    pub fn click(&mut self, now: Instant) -> u32 {
        match self.last_click {
            Some(prev) if now.duration_since(prev) < STEP_WINDOW => self.step += 1,
            _ => self.step = 1,
        }
        self.last_click = Some(now);
        self.step
    }
}

//! Horizontal swipe detection.

use crate::events::Direction;

pub const DEFAULT_SWIPE_THRESHOLD_PX: u32 = 50;

/// Pairs touch start and end coordinates into swipes.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: i64,
    start: Option<i32>,
}

/// Outcome of a completed touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Navigate(Direction),
    /// The finger moved no further than the threshold.
    DeadZone,
}

impl SwipeTracker {
    pub fn new(threshold_px: u32) -> Self {
        Self {
            threshold: i64::from(threshold_px),
            start: None,
        }
    }

    pub fn touch_start(&mut self, x: i32) {
        self.start = Some(x);
    }

    /// Resolve the gesture ending at `x`. Returns `None` when no touch was
    /// started.
    pub fn touch_end(&mut self, x: i32) -> Option<Swipe> {
        let start = i64::from(self.start.take()?);
        let end = i64::from(x);
        // Moving the finger left reveals the next slide.
        let swipe = if end < start - self.threshold {
            Swipe::Navigate(Direction::Forward)
        } else if end > start + self.threshold {
            Swipe::Navigate(Direction::Backward)
        } else {
            Swipe::DeadZone
        };
        Some(swipe)
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD_PX)
    }
}

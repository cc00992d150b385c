//! Frame-coalesced pointer delivery.
//!
//! Hosts may deliver pointer moves faster than they can be drawn. Moves are
//! parked here and applied at most once per frame tick; a newer move replaces
//! the parked one, so only the latest position is ever processed.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use crate::viewport::ScreenPoint;

/// Holds at most one pending pointer move.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    pending: Option<ScreenPoint>,
    dropped: u64,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a move for the next frame. Returns true if it replaced an unprocessed one.
    pub fn queue(&mut self, point: ScreenPoint) -> bool {
        let replaced = self.pending.replace(point).is_some();
        if replaced {
            self.dropped += 1;
        }
        replaced
    }

    /// Take the parked move, leaving nothing pending.
    pub fn take(&mut self) -> Option<ScreenPoint> {
        self.pending.take()
    }

    /// Forget any parked move without applying it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Total moves superseded before they were applied.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

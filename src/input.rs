//! Pointer input helpers the terminal does not provide on its own.
//!
//! Terminals report individual button presses, not click counts, so double clicks are
//! reconstructed here from the time and row of consecutive presses.

use std::time::{Duration, Instant};

#[derive(Debug)]
/// Counts consecutive presses on the same row within a time window.
pub struct ClickTracker {
    window: Duration,
    last: Option<(Instant, u16, u8)>,
}

impl ClickTracker {
    #[must_use]
    /// A tracker treating presses closer than `window_ms` milliseconds as one gesture.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            last: None,
        }
    }

    /// Register a press on `row` at `now` and return the click count of the gesture so far.
    pub fn press(&mut self, row: u16, now: Instant) -> u8 {
        let clicks = match self.last {
            Some((at, last_row, count))
                if last_row == row && now.saturating_duration_since(at) <= self.window =>
            {
                count.saturating_add(1)
            }
            _ => 1,
        };
        self.last = Some((now, row, clicks));
        clicks
    }

    /// Forget the current gesture.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;

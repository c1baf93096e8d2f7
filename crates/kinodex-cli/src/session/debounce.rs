//! Latest-wins delayed-trigger timer for noisy inputs.

use std::time::{Duration, Instant};

/// Debounce timer: each new input cancels and re-arms the deadline, and
/// the trigger fires exactly once after the quiet period.
///
/// The TUI event loop ticks at a fixed interval and asks [`fire_due`]
/// whether the quiet period has elapsed.
///
/// [`fire_due`]: Debouncer::fire_due
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period before firing.
    delay: Duration,
    /// Pending deadline, if armed.
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates an unarmed debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms (or re-arms) the deadline at `now + delay`. A pending
    /// deadline is replaced, so only the latest input counts.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = now.checked_add(self.delay);
    }

    /// Disarms a pending deadline without firing.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once after the quiet period has elapsed,
    /// disarming the timer.
    #[must_use]
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

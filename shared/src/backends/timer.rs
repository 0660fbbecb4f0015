use std::time::Duration;

use super::Instant;

/// A Timer with a given duration after which it will enter into a "Ringing"
/// state. The Timer can be reset at any given time.
pub struct Timer {
    duration: Duration,
    last: Instant,
}

impl Timer {
    /// Creates a new Timer with a given Duration, starting at `now`
    pub fn new(duration: Duration, now: &Instant) -> Self {
        Self {
            duration,
            last: *now,
        }
    }

    /// Reset the Timer to a non-ringing state, and restart it
    pub fn reset(&mut self, now: &Instant) {
        self.last = *now;
    }

    /// Gets whether or not the Timer is ringing at `now`
    pub fn ringing(&self, now: &Instant) -> bool {
        self.last.elapsed(now) >= self.duration
    }

    /// Time since the Timer was last reset
    pub fn elapsed(&self, now: &Instant) -> Duration {
        self.last.elapsed(now)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

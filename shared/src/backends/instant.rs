use std::time::Duration;

/// Monotonic point in time.
///
/// Every session entry point takes the current `Instant` as an argument, so hosts
/// drive the clock from their frame loop and tests can step it deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    inner: std::time::Instant,
}

impl Instant {
    pub fn now() -> Self {
        Self {
            inner: std::time::Instant::now(),
        }
    }

    /// Time elapsed from `self` until `now`, or zero if `now` is earlier
    pub fn elapsed(&self, now: &Instant) -> Duration {
        now.inner.saturating_duration_since(self.inner)
    }

    pub fn add_millis(&mut self, millis: u32) {
        self.inner += Duration::from_millis(u64::from(millis));
    }

    pub fn add_duration(&mut self, duration: Duration) {
        self.inner += duration;
    }

    pub fn is_after(&self, other: &Instant) -> bool {
        self.inner > other.inner
    }
}

//! Auto-advancing carousel timer.
//!
//! Testimonials and featured work rotate on an interval. The timer pauses
//! while the pointer is over the carousel, resumes where it left off, and is
//! cleared for good on unmount. `static/carousel.js` is the browser side of
//! the same rules; this type is the reference behaviour.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    interval: Duration,
    elapsed: Duration,
    paused: bool,
    mounted: bool,
    index: usize,
    len: usize,
}

impl AutoAdvance {
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            paused: false,
            mounted: true,
            index: 0,
            len,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the timer is running at all.
    pub fn is_active(&self) -> bool {
        self.mounted && self.len > 1 && !self.interval.is_zero()
    }

    /// Let `dt` pass. Returns the new index when it changed.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        if !self.is_active() || self.paused {
            return None;
        }
        self.elapsed += dt;
        let steps = (self.elapsed.as_nanos() / self.interval.as_nanos()) as usize;
        if steps == 0 {
            return None;
        }
        self.elapsed = Duration::from_nanos(
            (self.elapsed.as_nanos() % self.interval.as_nanos()) as u64,
        );
        let before = self.index;
        self.index = (self.index + steps) % self.len;
        (self.index != before).then_some(self.index)
    }

    /// Manual navigation restarts the interval.
    pub fn go_to(&mut self, index: usize) {
        if self.len > 0 {
            self.index = index % self.len;
            self.elapsed = Duration::ZERO;
        }
    }

    pub fn pointer_enter(&mut self) {
        self.paused = true;
    }

    /// Resume without resetting the elapsed time.
    pub fn pointer_leave(&mut self) {
        self.paused = false;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.elapsed = Duration::ZERO;
    }
}

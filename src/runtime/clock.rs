//! Cooperative time: settle delays and debounced work.
//!
//! All waiting in the engine goes through [`Clock`] so tests run on virtual
//! time instead of real sleeps.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Time source and suspension point.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Block until `duration` has passed.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock for tests: sleeping advances time instantly and records the
/// requested duration.
#[derive(Clone, Debug)]
pub struct TestClock {
    state: Rc<RefCell<TestClockState>>,
}

#[derive(Debug)]
struct TestClockState {
    epoch: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(TestClockState {
                epoch: Instant::now(),
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }
}

impl TestClock {
    /// Create a virtual clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance virtual time without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.state.borrow_mut().elapsed += duration;
    }

    /// Durations of all sleeps requested so far.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        let state = self.state.borrow();
        state.epoch + state.elapsed
    }

    fn sleep(&mut self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}

/// Coalesce rapid successive submissions; only the last one within the window
/// is delivered once the window elapses without a newer submission.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Submit a value, resetting the window. Replaces any pending value.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Deliver the pending value if its window has elapsed.
    pub fn flush_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Deliver the pending value immediately, ignoring the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    /// Whether a submission is waiting out its window.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/clock.rs"]
mod tests;

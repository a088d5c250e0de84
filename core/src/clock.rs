//! Submission clock: wall time and the simulated submission delay.
//!
//! The delay stands in for a network round trip. It is injected so tests
//! can run the whole submit flow without waiting on a real timer.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use std::time::Duration;

pub trait SubmissionClock: Send {
    fn now(&self) -> DateTime<Utc>;

    /// Block for `duration`. The only suspension point in a session.
    fn sleep(&self, duration: Duration);
}

/// Real time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SubmissionClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual time for tests: `sleep` returns immediately, advances `now`,
/// and records the requested duration.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

#[derive(Debug)]
struct ManualState {
    now:    DateTime<Utc>,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(ManualState { now: start, sleeps: Vec::new() }),
        }
    }

    /// 2026-10-16 14:30:00 UTC.
    pub fn fixed() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 10, 16, 14, 30, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(start)
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        state.now += chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        // A poisoned lock only means a test panicked mid-update.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SubmissionClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        self.lock().sleeps.push(duration);
    }
}

impl<C: SubmissionClock + Sync> SubmissionClock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Clock abstraction for testable time handling.
//!
//! The scheduling core never calls `chrono::Utc::now()` directly — every
//! watermark and timer deadline is derived from a `Clock`, so scenario
//! tests (spec S1-S6) can move time forward deterministically instead of
//! sleeping in real wall-clock time.

use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides the current time, both as a monotonic `Instant`
/// (for timer deadlines) and as naive UTC (for watermark math).
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn utc_now(&self) -> NaiveDateTime;

    /// Monotonic duration from now until `at`, clamped to zero if `at` is
    /// not in the future. Used to arm timer deadlines from a UTC instant
    /// without the core ever reading the wall clock directly.
    fn duration_until(&self, at: NaiveDateTime) -> Duration {
        let now = self.utc_now();
        if at <= now {
            return Duration::ZERO;
        }
        (at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Fake clock for testing with controllable time.
///
/// `Instant` and UTC time advance together so that timer deadlines
/// computed from one stay consistent with watermarks computed from the
/// other.
#[derive(Clone)]
pub struct FakeClock {
    instant: Arc<Mutex<Instant>>,
    utc: Arc<Mutex<NaiveDateTime>>,
}

impl FakeClock {
    pub fn new(start_utc: NaiveDateTime) -> Self {
        Self {
            instant: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(start_utc)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        *self.instant.lock() += duration;
        if let Ok(delta) = chrono::Duration::from_std(duration) {
            *self.utc.lock() += delta;
        }
    }

    /// Jump directly to a UTC instant (keeps the monotonic clock's delta consistent).
    pub fn set_utc(&self, at: NaiveDateTime) {
        let mut utc = self.utc.lock();
        let delta = at - *utc;
        *utc = at;
        drop(utc);
        if delta > chrono::Duration::zero() {
            if let Ok(std_delta) = delta.to_std() {
                *self.instant.lock() += std_delta;
            }
        }
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.instant.lock()
    }

    fn utc_now(&self) -> NaiveDateTime {
        *self.utc.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;

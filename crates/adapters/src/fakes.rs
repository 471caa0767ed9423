// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Deterministic fakes for both external collaborators, so registry and
//! broadcaster tests never depend on real cron-expression parsing or a
//! real IANA timezone database.

use crate::cron_eval::{CronError, CronEvaluator};
use crate::timezone::{TimezoneConverter, TzError};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Fake cron evaluator: schedules map to a fixed step duration, or to an
/// explicit forced error for edge-case tests (e.g. "no matching date").
#[derive(Clone, Default)]
pub struct FakeCronEvaluator {
    inner: Arc<Mutex<FakeCronState>>,
}

#[derive(Default)]
struct FakeCronState {
    step_seconds: HashMap<String, i64>,
    force_err: HashMap<String, CronError>,
}

impl FakeCronEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schedule` as firing every `seconds` seconds, at second 0
    /// of the first matching minute boundary.
    pub fn every(self, schedule: impl Into<String>, seconds: i64) -> Self {
        self.inner.lock().step_seconds.insert(schedule.into(), seconds);
        self
    }

    /// Force `next_run_after` to return `err` for this schedule.
    pub fn fail(self, schedule: impl Into<String>, err: CronError) -> Self {
        self.inner.lock().force_err.insert(schedule.into(), err);
        self
    }
}

impl CronEvaluator for FakeCronEvaluator {
    fn next_run_after(
        &self,
        schedule: &str,
        after: NaiveDateTime,
    ) -> Result<NaiveDateTime, CronError> {
        let state = self.inner.lock();
        if let Some(err) = state.force_err.get(schedule) {
            return Err(err.clone());
        }
        let step = state.step_seconds.get(schedule).copied().unwrap_or(60);
        // Next boundary strictly after `after` — matches ordinary cron
        // semantics, where landing exactly on a boundary still waits for
        // the following one.
        let epoch = after.and_utc().timestamp();
        let rounded = (epoch / step + 1) * step;
        match chrono::DateTime::from_timestamp(rounded, 0) {
            Some(dt) => Ok(dt.naive_utc()),
            None => Err(CronError::NoMatchingDate {
                expression: schedule.to_string(),
                after,
            }),
        }
    }
}

/// Fake timezone converter: identity conversion for registered zones, with
/// the ability to force either failure mode per zone for edge-case tests.
#[derive(Clone, Default)]
pub struct FakeTimezoneConverter {
    inner: Arc<Mutex<FakeTzState>>,
}

#[derive(Default)]
struct FakeTzState {
    known_zones: std::collections::HashSet<String>,
    invalid_instants: std::collections::HashSet<NaiveDateTime>,
}

impl FakeTimezoneConverter {
    pub fn new() -> Self {
        let inner = FakeTzState {
            known_zones: ["Etc/UTC", "UTC"].into_iter().map(String::from).collect(),
            invalid_instants: Default::default(),
        };
        Self { inner: Arc::new(Mutex::new(inner)) }
    }

    pub fn with_zone(self, zone: impl Into<String>) -> Self {
        self.inner.lock().known_zones.insert(zone.into());
        self
    }

    /// Make `to_utc` report `InvalidDateTimeForTimezone` for this exact
    /// local instant (simulating a DST gap), once per registered instant.
    pub fn with_invalid_instant(self, local: NaiveDateTime) -> Self {
        self.inner.lock().invalid_instants.insert(local);
        self
    }
}

impl TimezoneConverter for FakeTimezoneConverter {
    fn to_tz(&self, naive_utc: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TzError> {
        if !self.inner.lock().known_zones.contains(zone) {
            return Err(TzError::InvalidZone { zone: zone.to_string() });
        }
        Ok(naive_utc)
    }

    fn to_utc(&self, local: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TzError> {
        if !self.inner.lock().known_zones.contains(zone) {
            return Err(TzError::InvalidZone { zone: zone.to_string() });
        }
        if self.inner.lock().invalid_instants.remove(&local) {
            return Err(TzError::InvalidDateTimeForTimezone { zone: zone.to_string(), local });
        }
        Ok(local)
    }
}

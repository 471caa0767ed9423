// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use chrono::{NaiveDate, NaiveDateTime};

/// Proptest strategies for core model types.
pub mod strategies {
    use crate::job::{Job, JobState, Schedule};
    use proptest::prelude::*;

    pub fn arb_job_state() -> impl Strategy<Value = JobState> {
        prop_oneof![Just(JobState::Active), Just(JobState::Inactive)]
    }

    pub fn arb_minutely_job(name_prefix: &'static str) -> impl Strategy<Value = Job> {
        (0u32..1000, arb_job_state()).prop_map(move |(n, state)| {
            Job::new(format!("{name_prefix}-{n}"), Schedule::new("* * * * *"), "Etc/UTC", state)
        })
    }
}

/// Shorthand for building a UTC naive datetime in tests without chrono's
/// `Option`-returning constructors littering every call site.
#[allow(clippy::panic)]
pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .unwrap_or_else(|| panic!("invalid test datetime {year}-{month}-{day} {hour}:{min}:{sec}"))
}

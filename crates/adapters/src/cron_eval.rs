// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! The cron-expression evaluator collaborator.
//!
//! The scheduling core treats the schedule string as opaque and only ever
//! asks "what's the next run at or after this local wall-clock time?" —
//! it never parses cron syntax itself.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::str::FromStr;
use thiserror::Error;

/// Failure evaluating a cron expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("no matching date for cron expression '{expression}' after {after}")]
    NoMatchingDate { expression: String, after: NaiveDateTime },
}

/// Computes the next firing instant for an opaque cron-like expression.
pub trait CronEvaluator: Send + Sync {
    /// Returns the first instant strictly after `after` that matches
    /// `schedule`. A job added at a watermark that already sits on a
    /// matching boundary does not fire again for that same instant — it
    /// waits for the next one (ordinary cron semantics).
    fn next_run_after(
        &self,
        schedule: &str,
        after: NaiveDateTime,
    ) -> Result<NaiveDateTime, CronError>;
}

/// Production evaluator backed by the `cron` crate.
///
/// `cron::Schedule` only operates over `DateTime<Tz>`; since the core
/// only cares about wall-clock fields (minute/hour/day/month/weekday), the
/// naive local datetime is carried through as a `DateTime<Utc>` purely as
/// a vehicle — no timezone semantics leak out, the caller already did the
/// zone conversion before calling this.
#[derive(Debug, Clone, Default)]
pub struct SystemCronEvaluator;

/// Normalize a standard 5-field crontab expression (`minute hour dom month
/// dow`) into the 6/7-field
/// `seconds minute hour dom month dow [year]` syntax the `cron` crate
/// requires. Named (`@daily`) and already-seconds-qualified expressions
/// pass through untouched.
fn normalize(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.starts_with('@') {
        return trimmed.to_string();
    }
    match trimmed.split_whitespace().count() {
        5 => format!("0 {trimmed}"),
        _ => trimmed.to_string(),
    }
}

impl CronEvaluator for SystemCronEvaluator {
    fn next_run_after(
        &self,
        schedule: &str,
        after: NaiveDateTime,
    ) -> Result<NaiveDateTime, CronError> {
        let normalized = normalize(schedule);
        let parsed =
            cron::Schedule::from_str(&normalized).map_err(|e| CronError::InvalidExpression {
                expression: schedule.to_string(),
                reason: e.to_string(),
            })?;

        let carrier: DateTime<Utc> = DateTime::from_naive_utc_and_offset(after, Utc);
        parsed
            .after(&carrier)
            .next()
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| CronError::NoMatchingDate {
                expression: schedule.to_string(),
                after,
            })
    }
}

#[cfg(test)]
#[path = "cron_eval_tests.rs"]
mod tests;

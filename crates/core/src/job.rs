// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Job identity, schedule, and lifecycle state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cron-like schedule: an opaque expression plus the reboot flag.
///
/// The expression itself is opaque to the core — it is only ever handed
/// to the external [`crate::CronEvaluator`]-shaped collaborator (declared
/// in `cronspine-adapters`, not here, to keep this crate evaluator-agnostic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub expression: String,
    /// When true, the job fires once on registration/hot-join instead of
    /// recurring; it never enters the firing queue.
    #[serde(default)]
    pub reboot: bool,
}

impl Schedule {
    pub fn new(expression: impl Into<String>) -> Self {
        Self { expression: expression.into(), reboot: false }
    }

    pub fn reboot(expression: impl Into<String>) -> Self {
        Self { expression: expression.into(), reboot: true }
    }
}

/// Whether a job currently produces downstream `execute` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Active,
    Inactive,
}

impl JobState {
    pub fn is_active(self) -> bool {
        matches!(self, JobState::Active)
    }
}

crate::simple_display! {
    JobState {
        Active => "active",
        Inactive => "inactive",
    }
}

/// A job in the catalog.
///
/// `extra` carries fields the core forwards but never interprets (task
/// body, overlap policy, etc.) — pass it through, don't parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub schedule: Schedule,
    pub timezone: String,
    pub state: JobState,
    #[serde(default)]
    pub extra: Value,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        schedule: Schedule,
        timezone: impl Into<String>,
        state: JobState,
    ) -> Self {
        Self { name: name.into(), schedule, timezone: timezone.into(), state, extra: Value::Null }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            name: String = "job-a",
            timezone: String = "Etc/UTC",
        }
        set {
            schedule: Schedule = Schedule::new("* * * * *"),
            state: JobState = JobState::Active,
            extra: Value = Value::Null,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! The firing queue's bucket type.

use chrono::NaiveDateTime;
use cronspine_core::Job;

/// All jobs due at exactly the same instant.
///
/// `jobs` is kept in most-recently-inserted-first order: `add` prepends,
/// so jobs sharing an instant are emitted in insertion-reverse order.
#[derive(Debug, Clone, PartialEq)]
pub struct FiringBucket {
    pub naive_dt: NaiveDateTime,
    pub jobs: Vec<Job>,
}

impl FiringBucket {
    pub fn single(naive_dt: NaiveDateTime, job: Job) -> Self {
        Self { naive_dt, jobs: vec![job] }
    }

    pub fn prepend(&mut self, job: Job) {
        self.jobs.insert(0, job);
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! In-memory `Storage`, for tests and for running a scheduler without
//! cross-restart durability.

use crate::traits::Storage;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use cronspine_core::{Job, JobState, SchedulerId, StorageError};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct SchedulerState {
    jobs: HashMap<String, Job>,
    last_execution_date: Option<NaiveDateTime>,
}

/// `Storage` backed by a plain in-process map.
///
/// A scheduler that has never been written to is absent from `schedulers`,
/// which is how `jobs`/`last_execution_date` distinguish "never touched"
/// (`not_applicable` / `unknown`) from "touched, but empty".
#[derive(Default)]
pub struct InMemoryStorage {
    schedulers: Mutex<HashMap<SchedulerId, SchedulerState>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn jobs(&self, scheduler: &SchedulerId) -> Result<Option<Vec<Job>>, StorageError> {
        let guard = self.schedulers.lock();
        Ok(guard.get(scheduler).map(|s| s.jobs.values().cloned().collect()))
    }

    async fn add_job(&self, scheduler: &SchedulerId, job: &Job) -> Result<(), StorageError> {
        let mut guard = self.schedulers.lock();
        guard.entry(scheduler.clone()).or_default().jobs.insert(job.name.clone(), job.clone());
        Ok(())
    }

    async fn delete_job(&self, scheduler: &SchedulerId, name: &str) -> Result<(), StorageError> {
        let mut guard = self.schedulers.lock();
        guard.entry(scheduler.clone()).or_default().jobs.remove(name);
        Ok(())
    }

    async fn update_job_state(
        &self,
        scheduler: &SchedulerId,
        name: &str,
        state: JobState,
    ) -> Result<(), StorageError> {
        let mut guard = self.schedulers.lock();
        if let Some(job) = guard.entry(scheduler.clone()).or_default().jobs.get_mut(name) {
            job.state = state;
        }
        Ok(())
    }

    async fn purge(&self, scheduler: &SchedulerId) -> Result<(), StorageError> {
        let mut guard = self.schedulers.lock();
        guard.entry(scheduler.clone()).or_default().jobs.clear();
        Ok(())
    }

    async fn last_execution_date(
        &self,
        scheduler: &SchedulerId,
    ) -> Result<Option<NaiveDateTime>, StorageError> {
        let guard = self.schedulers.lock();
        Ok(guard.get(scheduler).and_then(|s| s.last_execution_date))
    }

    async fn update_last_execution_date(
        &self,
        scheduler: &SchedulerId,
        at: NaiveDateTime,
    ) -> Result<(), StorageError> {
        let mut guard = self.schedulers.lock();
        guard.entry(scheduler.clone()).or_default().last_execution_date = Some(at);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

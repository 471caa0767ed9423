// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! The storage adapter trait.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use cronspine_core::{Job, JobState, SchedulerId, StorageError};

/// Durable persistence for a scheduler's job catalog and watermark.
///
/// Every call is scoped by [`SchedulerId`] so a single backend can serve
/// more than one independent scheduler instance. Implementations must be
/// safe for concurrent calls from both the registry and the broadcaster
/// actors; within a single actor, calls are always made
/// serially, so no implementation needs to support overlapping writes
/// from the *same* caller.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the persisted job catalog. `Ok(None)` means "not applicable" —
    /// this scheduler has never persisted anything, so the caller should
    /// seed the catalog from its own initial list instead.
    async fn jobs(&self, scheduler: &SchedulerId) -> Result<Option<Vec<Job>>, StorageError>;

    async fn add_job(&self, scheduler: &SchedulerId, job: &Job) -> Result<(), StorageError>;

    async fn delete_job(&self, scheduler: &SchedulerId, name: &str) -> Result<(), StorageError>;

    async fn update_job_state(
        &self,
        scheduler: &SchedulerId,
        name: &str,
        state: JobState,
    ) -> Result<(), StorageError>;

    async fn purge(&self, scheduler: &SchedulerId) -> Result<(), StorageError>;

    /// `Ok(None)` means "unknown" — the caller should seed the watermark
    /// from the current wall-clock time instead.
    async fn last_execution_date(
        &self,
        scheduler: &SchedulerId,
    ) -> Result<Option<NaiveDateTime>, StorageError>;

    async fn update_last_execution_date(
        &self,
        scheduler: &SchedulerId,
        at: NaiveDateTime,
    ) -> Result<(), StorageError>;
}

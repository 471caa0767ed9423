// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Durable `Storage` backed by `sled`, for a single-node daemon that must
//! survive process restarts: durable last-execution time.

use crate::traits::Storage;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use cronspine_core::{Job, JobState, SchedulerId, StorageError};
use std::path::Path;

const JOBS_TREE: &str = "jobs";
const META_TREE: &str = "scheduler_meta";
const WATERMARK_TREE: &str = "watermark";

fn job_key(scheduler: &SchedulerId, name: &str) -> Vec<u8> {
    let mut key = scheduler.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(name.as_bytes());
    key
}

fn backend_err(e: sled::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// `Storage` backed by an on-disk `sled` database.
pub struct SledStorage {
    db: sled::Db,
}

impl SledStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(backend_err)?;
        Ok(Self { db })
    }

    fn jobs_tree(&self) -> Result<sled::Tree, StorageError> {
        self.db.open_tree(JOBS_TREE).map_err(backend_err)
    }

    fn meta_tree(&self) -> Result<sled::Tree, StorageError> {
        self.db.open_tree(META_TREE).map_err(backend_err)
    }

    fn watermark_tree(&self) -> Result<sled::Tree, StorageError> {
        self.db.open_tree(WATERMARK_TREE).map_err(backend_err)
    }

    fn mark_touched(&self, scheduler: &SchedulerId) -> Result<(), StorageError> {
        self.meta_tree()?.insert(scheduler.as_str().as_bytes(), vec![1u8]).map_err(backend_err)?;
        Ok(())
    }
}

#[async_trait]
impl Storage for SledStorage {
    async fn jobs(&self, scheduler: &SchedulerId) -> Result<Option<Vec<Job>>, StorageError> {
        let touched = self.meta_tree()?.contains_key(scheduler.as_str()).map_err(backend_err)?;
        if !touched {
            return Ok(None);
        }
        let mut prefix = scheduler.as_str().as_bytes().to_vec();
        prefix.push(0);
        let mut jobs = Vec::new();
        for entry in self.jobs_tree()?.scan_prefix(&prefix) {
            let (_, value) = entry.map_err(backend_err)?;
            let job: Job = serde_json::from_slice(&value)
                .map_err(|e| StorageError::Backend(format!("corrupt job record: {e}")))?;
            jobs.push(job);
        }
        Ok(Some(jobs))
    }

    async fn add_job(&self, scheduler: &SchedulerId, job: &Job) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(job)
            .map_err(|e| StorageError::Backend(format!("encode job: {e}")))?;
        self.jobs_tree()?.insert(job_key(scheduler, &job.name), bytes).map_err(backend_err)?;
        self.mark_touched(scheduler)?;
        self.db.flush_async().await.map_err(backend_err)?;
        Ok(())
    }

    async fn delete_job(&self, scheduler: &SchedulerId, name: &str) -> Result<(), StorageError> {
        self.jobs_tree()?.remove(job_key(scheduler, name)).map_err(backend_err)?;
        self.mark_touched(scheduler)?;
        self.db.flush_async().await.map_err(backend_err)?;
        Ok(())
    }

    async fn update_job_state(
        &self,
        scheduler: &SchedulerId,
        name: &str,
        state: JobState,
    ) -> Result<(), StorageError> {
        let tree = self.jobs_tree()?;
        let key = job_key(scheduler, name);
        if let Some(existing) = tree.get(&key).map_err(backend_err)? {
            let mut job: Job = serde_json::from_slice(&existing)
                .map_err(|e| StorageError::Backend(format!("corrupt job record: {e}")))?;
            job.state = state;
            let bytes = serde_json::to_vec(&job)
                .map_err(|e| StorageError::Backend(format!("encode job: {e}")))?;
            tree.insert(key, bytes).map_err(backend_err)?;
            self.db.flush_async().await.map_err(backend_err)?;
        }
        Ok(())
    }

    async fn purge(&self, scheduler: &SchedulerId) -> Result<(), StorageError> {
        let mut prefix = scheduler.as_str().as_bytes().to_vec();
        prefix.push(0);
        let tree = self.jobs_tree()?;
        let keys: Vec<_> = tree.scan_prefix(&prefix).keys().collect::<Result<_, _>>().map_err(backend_err)?;
        for key in keys {
            tree.remove(key).map_err(backend_err)?;
        }
        self.mark_touched(scheduler)?;
        self.db.flush_async().await.map_err(backend_err)?;
        Ok(())
    }

    async fn last_execution_date(
        &self,
        scheduler: &SchedulerId,
    ) -> Result<Option<NaiveDateTime>, StorageError> {
        let Some(bytes) = self.watermark_tree()?.get(scheduler.as_str()).map_err(backend_err)?
        else {
            return Ok(None);
        };
        let at: NaiveDateTime = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Backend(format!("corrupt watermark: {e}")))?;
        Ok(Some(at))
    }

    async fn update_last_execution_date(
        &self,
        scheduler: &SchedulerId,
        at: NaiveDateTime,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&at)
            .map_err(|e| StorageError::Backend(format!("encode watermark: {e}")))?;
        self.watermark_tree()?.insert(scheduler.as_str(), bytes).map_err(backend_err)?;
        self.db.flush_async().await.map_err(backend_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sled_backed_tests.rs"]
mod tests;

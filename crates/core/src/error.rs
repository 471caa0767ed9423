// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Error taxonomy shared by both actors.
//!
//! Per-adapter errors (invalid cron zone, unparsable schedule) live next
//! to the traits that produce them in `cronspine-adapters`; only the
//! errors that are meaningful at the actor boundary — a storage failure,
//! or the fatal `JobInPast` invariant violation — live here.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Failure returned by a [`crate::Job`]-agnostic storage backend call.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors the `JobRegistry` actor can surface.
///
/// Any storage failure is not locally recoverable: the
/// handler returns the error, the actor's `run` loop exits, and the
/// supervisor restarts it (which re-reads state from storage).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors the `ExecutionBroadcaster` actor can surface.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// A computed firing instant fell before the watermark. This can only
    /// happen from a programming error (e.g. a clock that ran backwards,
    /// or a merge that didn't take `min(local, incoming)`);
    /// it is fatal rather than silently corrected, so the bug surfaces
    /// instead of producing an infinite firing loop.
    #[error(
        "job '{job}' computed a firing at {firing} before the watermark {watermark}; \
         this is a fatal scheduler invariant violation"
    )]
    JobInPast { job: String, firing: NaiveDateTime, watermark: NaiveDateTime },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Mailbox messages accepted by the `JobRegistry` actor.

use crate::handoff::RegistryHandoff;
use cronspine_core::{Job, JobState, RegistryEvent};
use tokio::sync::{mpsc, oneshot};

/// A message in the registry's mailbox.
///
/// All client-control-API commands are fire-and-forget (`cast`) except
/// `Jobs` and `Find`, which carry a reply channel (`call`) — matching the
/// sync/async split in the client control API.
pub enum Command {
    Add(Job),
    Delete(String),
    ChangeState(String, JobState),
    DeleteAll,
    Jobs(oneshot::Sender<Vec<Job>>),
    Find(String, oneshot::Sender<Option<Job>>),

    /// Register the downstream subscriber's event sink. Only one
    /// subscriber is supported at a time, matching the single
    /// `ExecutionBroadcaster` consumer downstream of this actor.
    Subscribe(mpsc::Sender<RegistryEvent>),
    /// Downstream demand: "I can accept N more events."
    Demand(u64),

    BeginHandoff(oneshot::Sender<RegistryHandoff>),
    EndHandoff(RegistryHandoff),
    ResolveConflict(RegistryHandoff),
    Die,
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Mailbox messages accepted by the `ExecutionBroadcaster` actor.

use crate::handoff::BroadcasterHandoff;
use cronspine_core::BroadcastEvent;
use tokio::sync::{mpsc, oneshot};

/// A message in the broadcaster's control mailbox.
///
/// Unlike `JobRegistry`'s mailbox, this one never carries job mutations —
/// those arrive on a separate channel from the subscribed `JobRegistry`.
/// This mailbox only carries the downstream demand protocol and cluster
/// lifecycle commands.
pub enum Command {
    Subscribe(mpsc::Sender<BroadcastEvent>),
    Demand(u64),
    BeginHandoff(oneshot::Sender<BroadcasterHandoff>),
    EndHandoff(BroadcasterHandoff),
    ResolveConflict(BroadcasterHandoff),
    Die,
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Cluster hand-off snapshot for `ExecutionBroadcaster`.

use crate::bucket::FiringBucket;
use chrono::NaiveDateTime;

/// Snapshot of local state exchanged during a cluster membership hand-off.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcasterHandoff {
    pub firing_queue: Vec<FiringBucket>,
    pub watermark: NaiveDateTime,
}

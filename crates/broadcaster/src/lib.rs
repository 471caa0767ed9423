// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cronspine-broadcaster: `ExecutionBroadcaster`, the time-ordered firing
//! queue downstream of `JobRegistry`.
//!
//! Subscribes to a `JobRegistry`'s mutation events, maintains exactly one
//! pending timer for the nearest firing (a "single-timer invariant"),
//! and emits one `execute(job)` event per job due.

mod actor;
mod bucket;
mod commands;
mod handoff;

pub use actor::{BroadcasterGone, ExecutionBroadcaster, ExecutionBroadcasterHandle};
pub use bucket::FiringBucket;
pub use commands::Command;
pub use handoff::BroadcasterHandoff;

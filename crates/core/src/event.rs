// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Downstream event types.

use crate::job::Job;
use serde::{Deserialize, Serialize};

/// Mutation event emitted by `JobRegistry` to its downstream subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    Add(Job),
    Remove(String),
}

impl RegistryEvent {
    pub fn job_name(&self) -> &str {
        match self {
            RegistryEvent::Add(job) => &job.name,
            RegistryEvent::Remove(name) => name,
        }
    }
}

crate::simple_display! {
    RegistryEvent {
        Add(..) => "add",
        Remove(..) => "remove",
    }
}

/// Event emitted by `ExecutionBroadcaster` when a job is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    pub job: Job,
}

impl BroadcastEvent {
    pub fn new(job: Job) -> Self {
        Self { job }
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Cluster hand-off snapshot for `JobRegistry`.

use cronspine_core::{Job, RegistryEvent};

/// Snapshot of local state exchanged during a cluster membership hand-off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryHandoff {
    pub catalog: Vec<Job>,
    pub outbound_buffer: Vec<RegistryEvent>,
}

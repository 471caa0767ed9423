// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Scheduler instance identity.
//!
//! A deployment may run more than one independent scheduler against the
//! same storage backend (e.g. one per tenant). Every `Storage` call is
//! scoped by a `SchedulerId` so the backend can namespace its keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a scheduler instance, threaded through every storage call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchedulerId(String);

impl SchedulerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SchedulerId {
    fn default() -> Self {
        Self::new("default")
    }
}

impl fmt::Display for SchedulerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchedulerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SchedulerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

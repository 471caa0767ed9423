// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cronspine-adapters: the external collaborators the core depends on —
//! a cron-expression evaluator and an IANA timezone converter — plus the
//! production implementations (`cron` + `chrono-tz`) the daemon wires up.

pub mod cron_eval;
pub mod timezone;

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;

pub use cron_eval::{CronError, CronEvaluator, SystemCronEvaluator};
pub use timezone::{SystemTimezoneConverter, TzError, TimezoneConverter};

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{FakeCronEvaluator, FakeTimezoneConverter};

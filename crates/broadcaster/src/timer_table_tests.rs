// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Table-driven coverage of the `reset_timer` decision table in spec
//! §4.2: empty queue cancels, an unchanged head instant is a no-op, and
//! anything else re-arms.

use super::*;
use cronspine_adapters::{FakeCronEvaluator, FakeTimezoneConverter};
use cronspine_core::test_support::utc;
use cronspine_core::{FakeClock, Job, Schedule};
use cronspine_registry::JobRegistry;
use cronspine_storage::InMemoryStorage;
use tokio::sync::mpsc;

fn broadcaster_for_test() -> ExecutionBroadcaster<FakeClock> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(async {
        let storage = Arc::new(InMemoryStorage::default());
        let id = SchedulerId::default();
        let registry = JobRegistry::spawn(id, storage, Vec::new()).await.unwrap();
        let (_tx, mailbox) = mpsc::channel(8);
        let (_upstream_tx, upstream) = mpsc::channel(8);
        ExecutionBroadcaster {
            scheduler: SchedulerId::default(),
            storage: Arc::new(InMemoryStorage::default()),
            clock: FakeClock::new(utc(2020, 1, 1, 0, 0, 0)),
            cron: Arc::new(FakeCronEvaluator::new().every("* * * * *", 60)),
            timezones: Arc::new(FakeTimezoneConverter::new()),
            upstream,
            upstream_handle: registry,
            watermark: utc(2020, 1, 1, 0, 0, 0),
            queue: Vec::new(),
            armed_for: None,
            timer_deadline: None,
            buffer: Default::default(),
            demand: 0,
            subscriber: None,
            mailbox,
        }
    })
}

fn job(name: &str) -> Job {
    Job::new(name, Schedule::new("* * * * *"), "Etc/UTC", cronspine_core::JobState::Active)
}

#[test]
fn empty_queue_cancels_any_timer() {
    let mut b = broadcaster_for_test();
    b.armed_for = Some(utc(2020, 1, 1, 0, 5, 0));
    b.timer_deadline = Some(tokio::time::Instant::now());

    b.reset_timer();

    assert_eq!(b.armed_for, None);
    assert_eq!(b.timer_deadline, None);
}

#[test]
fn head_instant_unchanged_is_a_no_op() {
    let mut b = broadcaster_for_test();
    let at = utc(2020, 1, 1, 0, 1, 0);
    b.insert_into_queue(job("a"), at);
    b.reset_timer();
    let armed_deadline = b.timer_deadline;

    // A second mutation that keeps the same head instant must not re-arm.
    b.insert_into_queue(job("b"), at);
    b.reset_timer();

    assert_eq!(b.armed_for, Some(at));
    assert_eq!(b.timer_deadline, armed_deadline);
}

#[test]
fn new_head_instant_rearms() {
    let mut b = broadcaster_for_test();
    b.insert_into_queue(job("a"), utc(2020, 1, 1, 0, 5, 0));
    b.reset_timer();
    assert_eq!(b.armed_for, Some(utc(2020, 1, 1, 0, 5, 0)));

    b.insert_into_queue(job("b"), utc(2020, 1, 1, 0, 1, 0));
    b.reset_timer();

    assert_eq!(b.armed_for, Some(utc(2020, 1, 1, 0, 1, 0)));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

use super::*;
use cronspine_adapters::{FakeCronEvaluator, FakeTimezoneConverter};
use cronspine_core::test_support::utc;
use cronspine_core::{FakeClock, Job, JobState, Schedule, SchedulerId};
use cronspine_registry::JobRegistry;
use cronspine_storage::InMemoryStorage;
use std::time::Duration;
use tokio::sync::mpsc;

struct Harness {
    registry: JobRegistryHandle,
    broadcaster: ExecutionBroadcasterHandle,
    clock: FakeClock,
    storage: Arc<InMemoryStorage>,
    events: mpsc::Receiver<BroadcastEvent>,
}

async fn harness_at(start: NaiveDateTime) -> Harness {
    harness_with_cron(start, FakeCronEvaluator::new().every("* * * * *", 60).every("0 * * * *", 3600))
        .await
}

async fn harness_with_cron(start: NaiveDateTime, cron: FakeCronEvaluator) -> Harness {
    let storage = Arc::new(InMemoryStorage::default());
    let id = SchedulerId::default();
    let registry = JobRegistry::spawn(id.clone(), storage.clone(), Vec::new()).await.unwrap();
    let clock = FakeClock::new(start);
    let tz = Arc::new(FakeTimezoneConverter::new());
    let broadcaster = ExecutionBroadcaster::spawn(
        id,
        storage.clone(),
        clock.clone(),
        Arc::new(cron),
        tz,
        registry.clone(),
        8,
    )
    .await
    .unwrap();
    let events = broadcaster.subscribe(8).await.unwrap();
    broadcaster.demand(1000).await.unwrap();
    Harness { registry, broadcaster, clock, storage, events }
}

fn minutely(name: &str) -> Job {
    Job::new(name, Schedule::new("* * * * *"), "Etc/UTC", JobState::Active)
}

fn hourly(name: &str) -> Job {
    Job::new(name, Schedule::new("0 * * * *"), "Etc/UTC", JobState::Active)
}

/// Advance both the tokio paused clock and the scheduler's `FakeClock` in
/// lockstep, matching what a real clock would do.
async fn advance(h: &Harness, duration: Duration) {
    h.clock.advance(duration);
    tokio::time::advance(duration).await;
}

#[tokio::test(start_paused = true)]
async fn s1_single_minutely_job() {
    let mut h = harness_at(utc(2020, 1, 1, 0, 0, 0)).await;
    h.registry.add(minutely("A")).await.unwrap();

    advance(&h, Duration::from_secs(60)).await;

    let event = h.events.recv().await.unwrap();
    assert_eq!(event.job.name, "A");
    assert_eq!(
        h.storage.last_execution_date(&SchedulerId::default()).await.unwrap(),
        Some(utc(2020, 1, 1, 0, 1, 0))
    );
}

#[tokio::test(start_paused = true)]
async fn s2_reboot_job_fires_immediately_without_a_timer() {
    let mut h = harness_at(utc(2020, 1, 1, 0, 0, 0)).await;
    h.registry.add(Job::new("B", Schedule::reboot("* * * * *"), "Etc/UTC", JobState::Active)).await.unwrap();

    let event = tokio::time::timeout(Duration::from_millis(50), h.events.recv())
        .await
        .expect("reboot job should fire without waiting on a timer")
        .unwrap();
    assert_eq!(event.job.name, "B");
}

#[tokio::test(start_paused = true)]
async fn s3_coincident_firings_emit_in_insertion_reverse_order() {
    let mut h = harness_at(utc(2020, 1, 1, 0, 0, 0)).await;
    h.registry.add(hourly("C1")).await.unwrap();
    h.registry.add(hourly("C2")).await.unwrap();

    advance(&h, Duration::from_secs(3600)).await;

    let first = h.events.recv().await.unwrap();
    let second = h.events.recv().await.unwrap();
    assert_eq!(first.job.name, "C2");
    assert_eq!(second.job.name, "C1");
}

#[tokio::test(start_paused = true)]
async fn s4_delete_before_fire_cancels_the_timer() {
    let mut h = harness_at(utc(2020, 1, 1, 0, 0, 0)).await;
    h.registry.add(minutely("D")).await.unwrap();
    advance(&h, Duration::from_secs(1)).await;

    h.registry.delete("D").await.unwrap();
    advance(&h, Duration::from_secs(120)).await;

    assert!(h.events.try_recv().is_err(), "D must never fire once deleted");
}

#[tokio::test(start_paused = true)]
async fn s5_invalid_zone_is_dropped_but_catalog_and_other_jobs_are_unaffected() {
    let mut h = harness_at(utc(2020, 1, 1, 0, 0, 0)).await;
    h.registry.add(Job::new("E", Schedule::new("* * * * *"), "Not/A/Real/Zone", JobState::Active))
        .await
        .unwrap();
    h.registry.add(minutely("F")).await.unwrap();

    advance(&h, Duration::from_secs(60)).await;

    let event = h.events.recv().await.unwrap();
    assert_eq!(event.job.name, "F", "E must never be emitted");
    assert!(h.events.try_recv().is_err());
    // E is still served by the registry's own catalog query.
    assert!(h.registry.find("E").await.unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn s6_handoff_merges_to_the_earlier_watermark() {
    let h = harness_at(utc(2020, 6, 1, 12, 0, 0)).await;

    let incoming = BroadcasterHandoff {
        firing_queue: vec![FiringBucket::single(
            utc(2020, 6, 1, 11, 1, 0),
            minutely("F"),
        )],
        watermark: utc(2020, 6, 1, 11, 0, 0),
    };
    h.broadcaster.end_handoff(incoming).await.unwrap();

    let snapshot = h.broadcaster.begin_handoff().await.unwrap();
    assert_eq!(snapshot.watermark, utc(2020, 6, 1, 11, 0, 0));
    assert_eq!(snapshot.firing_queue.len(), 1);
    assert_eq!(snapshot.firing_queue[0].naive_dt, utc(2020, 6, 1, 11, 1, 0));
}

#[tokio::test(start_paused = true)]
async fn demand_withholds_events_until_requested() {
    let storage = Arc::new(InMemoryStorage::default());
    let id = SchedulerId::default();
    let registry = JobRegistry::spawn(id.clone(), storage.clone(), Vec::new()).await.unwrap();
    let clock = FakeClock::new(utc(2020, 1, 1, 0, 0, 0));
    let cron = Arc::new(FakeCronEvaluator::new().every("* * * * *", 60));
    let tz = Arc::new(FakeTimezoneConverter::new());
    let broadcaster =
        ExecutionBroadcaster::spawn(id, storage, clock.clone(), cron, tz, registry.clone(), 8)
            .await
            .unwrap();
    let mut events = broadcaster.subscribe(8).await.unwrap();

    registry.add(Job::new("B", Schedule::reboot("* * * * *"), "Etc/UTC", JobState::Active))
        .await
        .unwrap();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(events.try_recv().is_err(), "no demand yet, reboot event withheld");

    broadcaster.demand(1).await.unwrap();
    assert_eq!(events.recv().await.unwrap().job.name, "B");
}

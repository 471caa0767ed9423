// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

use super::*;
use cronspine_core::test_support::utc;
use cronspine_core::Schedule;

fn job(name: &str) -> Job {
    Job::new(name, Schedule::new("* * * * *"), "Etc/UTC", JobState::Active)
}

#[tokio::test]
async fn untouched_scheduler_reports_not_applicable() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SledStorage::open(dir.path()).unwrap();
    let id = SchedulerId::default();
    assert_eq!(storage.jobs(&id).await.unwrap(), None);
}

#[tokio::test]
async fn catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = SchedulerId::default();
    {
        let storage = SledStorage::open(dir.path()).unwrap();
        storage.add_job(&id, &job("a")).await.unwrap();
        storage.update_last_execution_date(&id, utc(2020, 1, 1, 0, 1, 1)).await.unwrap();
    }
    let reopened = SledStorage::open(dir.path()).unwrap();
    let jobs = reopened.jobs(&id).await.unwrap().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].name, "a");
    assert_eq!(
        reopened.last_execution_date(&id).await.unwrap(),
        Some(utc(2020, 1, 1, 0, 1, 1))
    );
}

#[tokio::test]
async fn update_job_state_persists() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SledStorage::open(dir.path()).unwrap();
    let id = SchedulerId::default();
    storage.add_job(&id, &job("a")).await.unwrap();
    storage.update_job_state(&id, "a", JobState::Inactive).await.unwrap();
    let jobs = storage.jobs(&id).await.unwrap().unwrap();
    assert_eq!(jobs[0].state, JobState::Inactive);
}

#[tokio::test]
async fn purge_removes_all_jobs_for_scheduler_only() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SledStorage::open(dir.path()).unwrap();
    let a = SchedulerId::new("a");
    let b = SchedulerId::new("b");
    storage.add_job(&a, &job("x")).await.unwrap();
    storage.add_job(&b, &job("y")).await.unwrap();
    storage.purge(&a).await.unwrap();
    assert_eq!(storage.jobs(&a).await.unwrap(), Some(vec![]));
    assert_eq!(storage.jobs(&b).await.unwrap().unwrap().len(), 1);
}

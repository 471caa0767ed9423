// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Table-driven coverage of the registry's command table: for each
//! command and starting state, does it emit a downstream event, and if
//! so, which kind?

use super::*;
use cronspine_core::Schedule;
use cronspine_storage::InMemoryStorage;
use std::sync::Arc;

fn job(name: &str, state: JobState) -> Job {
    Job::builder().name(name).schedule(Schedule::new("* * * * *")).state(state).build()
}

async fn run_case(has_job: bool, initial_active: bool, op: &str) -> Option<&'static str> {
    let storage = Arc::new(InMemoryStorage::default());
    let handle = JobRegistry::spawn(SchedulerId::default(), storage, Vec::new()).await.unwrap();

    if has_job {
        let state = if initial_active { JobState::Active } else { JobState::Inactive };
        handle.add(job("x", state)).await.unwrap();
    }

    let mut rx = handle.subscribe(8).await.unwrap();
    handle.demand(100).await.unwrap();
    // Drain whatever the setup `add` above produced before exercising `op`.
    while rx.try_recv().is_ok() {}

    match op {
        "delete" => handle.delete("x").await.unwrap(),
        "change_to_active" => handle.change_state("x", JobState::Active).await.unwrap(),
        "change_to_inactive" => handle.change_state("x", JobState::Inactive).await.unwrap(),
        other => panic!("unknown op {other}"),
    }

    tokio::time::timeout(std::time::Duration::from_millis(50), rx.recv())
        .await
        .ok()
        .flatten()
        .map(|event| match event {
            RegistryEvent::Add(_) => "add",
            RegistryEvent::Remove(_) => "remove",
        })
}

#[yare::parameterized(
    delete_active_emits_remove        = { true,  true,  "delete",             Some("remove") },
    delete_inactive_emits_nothing     = { true,  false, "delete",             None },
    delete_missing_emits_nothing      = { false, false, "delete",             None },
    change_state_unchanged_active     = { true,  true,  "change_to_active",   None },
    change_state_unchanged_inactive   = { true,  false, "change_to_inactive", None },
    change_state_to_active_emits_add  = { true,  false, "change_to_active",   Some("add") },
    change_state_to_inactive_emits_remove = { true, true, "change_to_inactive", Some("remove") },
)]
fn command_table(has_job: bool, initial_active: bool, op: &str, expect: Option<&str>) {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let outcome = runtime.block_on(run_case(has_job, initial_active, op));
    assert_eq!(outcome, expect);
}

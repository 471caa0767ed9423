// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! The `ExecutionBroadcaster` actor.

use crate::bucket::FiringBucket;
use crate::commands::Command;
use crate::handoff::BroadcasterHandoff;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use cronspine_adapters::{CronEvaluator, TimezoneConverter, TzError};
use cronspine_core::{BroadcastError, BroadcastEvent, Clock, Job, RegistryEvent, SchedulerId};
use cronspine_registry::JobRegistryHandle;
use cronspine_storage::Storage;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant as TokioInstant;

/// Returned by [`ExecutionBroadcasterHandle`] methods when the actor's
/// mailbox has been dropped, i.e. the actor has already exited.
#[derive(Debug, Error)]
#[error("execution broadcaster actor is no longer running")]
pub struct BroadcasterGone;

const MAILBOX_CAPACITY: usize = 256;

/// How many unfilled mutation events this stage keeps on request from
/// its upstream `JobRegistry` at any one time. Small and fixed, since the
/// broadcaster processes events one at a time anyway; the demand
/// protocol back-pressures mutation bursts, not a pipeline depth.
const UPSTREAM_DEMAND: u64 = 1;

/// Time-ordered firing queue with a single pending timer.
pub struct ExecutionBroadcaster<C: Clock> {
    scheduler: SchedulerId,
    storage: Arc<dyn Storage>,
    clock: C,
    cron: Arc<dyn CronEvaluator>,
    timezones: Arc<dyn TimezoneConverter>,

    upstream: mpsc::Receiver<RegistryEvent>,
    upstream_handle: JobRegistryHandle,

    watermark: NaiveDateTime,
    queue: Vec<FiringBucket>,
    armed_for: Option<NaiveDateTime>,
    timer_deadline: Option<TokioInstant>,

    buffer: VecDeque<BroadcastEvent>,
    demand: u64,
    subscriber: Option<mpsc::Sender<BroadcastEvent>>,
    mailbox: mpsc::Receiver<Command>,
}

impl<C: Clock> ExecutionBroadcaster<C> {
    /// Read the watermark from storage (seeding from the clock if
    /// `unknown`), subscribe to `registry`, and spawn the actor task.
    #[allow(clippy::too_many_arguments)]
    pub async fn spawn(
        scheduler: SchedulerId,
        storage: Arc<dyn Storage>,
        clock: C,
        cron: Arc<dyn CronEvaluator>,
        timezones: Arc<dyn TimezoneConverter>,
        registry: JobRegistryHandle,
        upstream_buffer: usize,
    ) -> Result<ExecutionBroadcasterHandle, BroadcastError> {
        let watermark =
            storage.last_execution_date(&scheduler).await?.unwrap_or_else(|| clock.utc_now());
        let upstream = registry
            .subscribe(upstream_buffer)
            .await
            .map_err(|_| BroadcastError::Storage(cronspine_core::StorageError::Backend(
                "job registry actor is no longer running".to_string(),
            )))?;

        let (tx, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = ExecutionBroadcaster {
            scheduler,
            storage,
            clock,
            cron,
            timezones,
            upstream,
            upstream_handle: registry,
            watermark,
            queue: Vec::new(),
            armed_for: None,
            timer_deadline: None,
            buffer: VecDeque::new(),
            demand: 0,
            subscriber: None,
            mailbox,
        };
        tokio::spawn(actor.run());
        Ok(ExecutionBroadcasterHandle { tx })
    }

    async fn run(mut self) {
        let _ = self.upstream_handle.demand(UPSTREAM_DEMAND).await;

        loop {
            tokio::select! {
                maybe_cmd = self.mailbox.recv() => {
                    match maybe_cmd {
                        Some(Command::Die) | None => return,
                        Some(cmd) => {
                            if let Err(err) = self.handle_command(cmd).await {
                                tracing::error!(scheduler = %self.scheduler, error = %err, "execution broadcaster storage failure, stopping actor");
                                return;
                            }
                        }
                    }
                }
                maybe_event = self.upstream.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if let Err(err) = self.handle_upstream(event).await {
                                tracing::error!(scheduler = %self.scheduler, error = %err, "execution broadcaster storage failure, stopping actor");
                                return;
                            }
                            let _ = self.upstream_handle.demand(UPSTREAM_DEMAND).await;
                        }
                        None => {
                            // Upstream registry is gone; keep serving queries
                            // and pending timers, but no more mutations arrive.
                        }
                    }
                }
                _ = Self::wait_for_deadline(self.timer_deadline) => {
                    self.timer_deadline = None;
                    self.armed_for = None;
                    if let Err(err) = self.handle_timer_fire().await {
                        tracing::error!(scheduler = %self.scheduler, error = %err, "execution broadcaster fatal timer error, stopping actor");
                        return;
                    }
                }
            }
        }
    }

    async fn wait_for_deadline(deadline: Option<TokioInstant>) {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    async fn handle_command(&mut self, cmd: Command) -> Result<(), BroadcastError> {
        match cmd {
            Command::Subscribe(sender) => {
                self.subscriber = Some(sender);
                self.release_buffered().await;
            }
            Command::Demand(n) => {
                self.demand = self.demand.saturating_add(n);
                self.release_buffered().await;
            }
            Command::BeginHandoff(reply) => {
                let snapshot =
                    BroadcasterHandoff { firing_queue: self.queue.clone(), watermark: self.watermark };
                let _ = reply.send(snapshot);
            }
            Command::EndHandoff(handoff) | Command::ResolveConflict(handoff) => {
                self.apply_handoff(handoff).await?;
            }
            Command::Die => unreachable!("handled in run() before dispatch"),
        }
        Ok(())
    }

    async fn handle_upstream(&mut self, event: RegistryEvent) -> Result<(), BroadcastError> {
        match event {
            RegistryEvent::Add(job) => self.apply_add(job).await?,
            RegistryEvent::Remove(name) => self.remove_from_queue(&name),
        }
        self.reset_timer();
        self.release_buffered().await;
        Ok(())
    }

    /// Apply one `add(job)` mutation: reboot jobs fire immediately and
    /// never enter the queue; everything else is computed and inserted.
    async fn apply_add(&mut self, job: Job) -> Result<(), BroadcastError> {
        if job.schedule.reboot {
            self.buffer.push_back(BroadcastEvent::new(job));
            return Ok(());
        }
        if let Some(at) = self.compute_next_firing(&job, self.watermark).await? {
            self.insert_into_queue(job, at);
        }
        Ok(())
    }

    /// Compute the next firing instant for `job` at or after `watermark`,
    /// per the "applying add(job)" algorithm.
    async fn compute_next_firing(
        &self,
        job: &Job,
        watermark: NaiveDateTime,
    ) -> Result<Option<NaiveDateTime>, BroadcastError> {
        let mut probe = watermark;
        loop {
            let local_from = match self.timezones.to_tz(probe, &job.timezone) {
                Ok(local) => local,
                Err(TzError::InvalidZone { zone }) => {
                    tracing::error!(job = %job.name, zone, "unrecognized timezone, dropping job from firing queue");
                    return Ok(None);
                }
                Err(TzError::InvalidDateTimeForTimezone { .. }) => {
                    probe += ChronoDuration::seconds(60);
                    continue;
                }
            };

            let local_next = match self.cron.next_run_after(&job.schedule.expression, local_from) {
                Ok(next) => next,
                Err(err) => {
                    tracing::warn!(job = %job.name, schedule = %job.schedule.expression, error = %err, "no matching date, dropping job from firing queue");
                    return Ok(None);
                }
            };

            let utc_next = match self.timezones.to_utc(local_next, &job.timezone) {
                Ok(utc) => utc,
                Err(TzError::InvalidZone { zone }) => {
                    tracing::error!(job = %job.name, zone, "unrecognized timezone, dropping job from firing queue");
                    return Ok(None);
                }
                Err(TzError::InvalidDateTimeForTimezone { .. }) => {
                    probe += ChronoDuration::seconds(60);
                    continue;
                }
            };

            if utc_next < watermark {
                return Err(BroadcastError::JobInPast {
                    job: job.name.clone(),
                    firing: utc_next,
                    watermark,
                });
            }
            return Ok(Some(utc_next));
        }
    }

    fn insert_into_queue(&mut self, job: Job, at: NaiveDateTime) {
        match self.queue.iter_mut().find(|bucket| bucket.naive_dt == at) {
            Some(bucket) => bucket.prepend(job),
            None => self.queue.push(FiringBucket::single(at, job)),
        }
        self.queue.sort_by_key(|bucket| bucket.naive_dt);
    }

    fn remove_from_queue(&mut self, name: &str) {
        for bucket in self.queue.iter_mut() {
            bucket.jobs.retain(|job| job.name != name);
        }
        self.queue.retain(|bucket| !bucket.jobs.is_empty());
    }

    /// Re-arm the single pending timer after any state change. A no-op
    /// if the head bucket's instant already matches the currently-armed
    /// deadline.
    fn reset_timer(&mut self) {
        let Some(head) = self.queue.first() else {
            self.timer_deadline = None;
            self.armed_for = None;
            return;
        };
        if self.armed_for == Some(head.naive_dt) {
            return;
        }
        self.armed_for = Some(head.naive_dt);
        self.timer_deadline = Some(TokioInstant::now() + self.clock.duration_until(head.naive_dt));
    }

    /// Timer fired for the head bucket: persist the watermark, pop the
    /// bucket, re-schedule its jobs, reset the timer, then emit (spec
    /// §4.2 "Timer fires").
    async fn handle_timer_fire(&mut self) -> Result<(), BroadcastError> {
        if self.queue.is_empty() {
            return Ok(());
        }
        let bucket = self.queue.remove(0);

        self.storage.update_last_execution_date(&self.scheduler, bucket.naive_dt).await?;
        self.watermark = bucket.naive_dt + ChronoDuration::seconds(1);

        for job in bucket.jobs.iter().cloned() {
            self.apply_add(job).await?;
        }
        self.reset_timer();

        for job in bucket.jobs {
            self.buffer.push_back(BroadcastEvent::new(job));
        }
        self.release_buffered().await;
        Ok(())
    }

    /// Merge an incoming hand-off snapshot: watermark becomes the earlier
    /// of local/incoming, then every incoming job is recomputed against
    /// that merged watermark and reinserted.
    async fn apply_handoff(&mut self, handoff: BroadcasterHandoff) -> Result<(), BroadcastError> {
        self.watermark = self.watermark.min(handoff.watermark);
        let incoming: Vec<Job> = handoff.firing_queue.into_iter().flat_map(|b| b.jobs).collect();
        for job in incoming {
            self.apply_add(job).await?;
        }
        self.reset_timer();
        self.release_buffered().await;
        Ok(())
    }

    async fn release_buffered(&mut self) {
        let Some(sender) = self.subscriber.as_ref() else { return };
        while self.demand > 0 {
            let Some(event) = self.buffer.pop_front() else { break };
            if sender.send(event).await.is_err() {
                self.subscriber = None;
                break;
            }
            self.demand -= 1;
        }
    }
}

/// A cloneable handle to a running [`ExecutionBroadcaster`] actor's
/// control mailbox.
#[derive(Clone)]
pub struct ExecutionBroadcasterHandle {
    tx: mpsc::Sender<Command>,
}

impl ExecutionBroadcasterHandle {
    async fn cast(&self, cmd: Command) -> Result<(), BroadcasterGone> {
        self.tx.send(cmd).await.map_err(|_| BroadcasterGone)
    }

    pub async fn subscribe(&self, buffer: usize) -> Result<mpsc::Receiver<BroadcastEvent>, BroadcasterGone> {
        let (tx, rx) = mpsc::channel(buffer);
        self.cast(Command::Subscribe(tx)).await?;
        Ok(rx)
    }

    pub async fn demand(&self, n: u64) -> Result<(), BroadcasterGone> {
        self.cast(Command::Demand(n)).await
    }

    pub async fn begin_handoff(&self) -> Result<BroadcasterHandoff, BroadcasterGone> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::BeginHandoff(reply)).await.map_err(|_| BroadcasterGone)?;
        rx.await.map_err(|_| BroadcasterGone)
    }

    pub async fn end_handoff(&self, handoff: BroadcasterHandoff) -> Result<(), BroadcasterGone> {
        self.cast(Command::EndHandoff(handoff)).await
    }

    pub async fn resolve_conflict(&self, handoff: BroadcasterHandoff) -> Result<(), BroadcasterGone> {
        self.cast(Command::ResolveConflict(handoff)).await
    }

    pub async fn die(&self) -> Result<(), BroadcasterGone> {
        self.cast(Command::Die).await
    }
}

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "property_tests.rs"]
mod property_tests;

#[cfg(test)]
#[path = "timer_table_tests.rs"]
mod timer_table_tests;

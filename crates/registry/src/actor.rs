// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! The `JobRegistry` actor: a single-inbox, message-serial owner of the
//! job catalog.

use crate::commands::Command;
use crate::handoff::RegistryHandoff;
use cronspine_core::{Job, JobState, RegistryError, RegistryEvent, SchedulerId};
use cronspine_storage::Storage;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Returned by [`JobRegistryHandle`] methods when the actor's mailbox has
/// been dropped, i.e. the actor has already exited (normally after a
/// storage failure — see [`RegistryError`]).
#[derive(Debug, Error)]
#[error("job registry actor is no longer running")]
pub struct RegistryGone;

/// Mailbox channel capacity for a single registry actor.
const MAILBOX_CAPACITY: usize = 256;

/// Authoritative catalog of jobs.
///
/// Runs as a detached task driven by [`JobRegistry::spawn`]; all state
/// below is only ever touched from within [`JobRegistry::run`], so no
/// locking is needed — the actor's single mailbox is the synchronization
/// point — a message-serial actor.
pub struct JobRegistry {
    id: SchedulerId,
    storage: Arc<dyn Storage>,
    catalog: HashMap<String, Job>,
    buffer: VecDeque<RegistryEvent>,
    demand: u64,
    subscriber: Option<mpsc::Sender<RegistryEvent>>,
    mailbox: mpsc::Receiver<Command>,
}

impl JobRegistry {
    /// Load the persisted catalog and spawn the actor task.
    ///
    /// `initial` seeds the catalog only if storage reports
    /// `not_applicable` (this scheduler has never persisted anything);
    /// otherwise the storage copy wins outright.
    pub async fn spawn(
        id: SchedulerId,
        storage: Arc<dyn Storage>,
        initial: Vec<Job>,
    ) -> Result<JobRegistryHandle, RegistryError> {
        let catalog: HashMap<String, Job> = match storage.jobs(&id).await? {
            Some(persisted) => persisted.into_iter().map(|job| (job.name.clone(), job)).collect(),
            None => initial.into_iter().map(|job| (job.name.clone(), job)).collect(),
        };
        let buffer = catalog
            .values()
            .filter(|job| job.is_active())
            .cloned()
            .map(RegistryEvent::Add)
            .collect();

        let (tx, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        let actor =
            JobRegistry { id, storage, catalog, buffer, demand: 0, subscriber: None, mailbox };
        tokio::spawn(actor.run());
        Ok(JobRegistryHandle { tx })
    }

    async fn run(mut self) {
        while let Some(cmd) = self.mailbox.recv().await {
            let outcome = match cmd {
                Command::Add(job) => self.handle_add(job).await,
                Command::Delete(name) => self.handle_delete(name).await,
                Command::ChangeState(name, state) => self.handle_change_state(name, state).await,
                Command::DeleteAll => self.handle_delete_all().await,
                Command::Jobs(reply) => {
                    let _ = reply.send(self.catalog.values().cloned().collect());
                    Ok(())
                }
                Command::Find(name, reply) => {
                    let _ = reply.send(self.catalog.get(&name).cloned());
                    Ok(())
                }
                Command::Subscribe(sender) => {
                    self.subscriber = Some(sender);
                    self.release_buffered().await;
                    Ok(())
                }
                Command::Demand(n) => {
                    self.demand = self.demand.saturating_add(n);
                    self.release_buffered().await;
                    Ok(())
                }
                Command::BeginHandoff(reply) => {
                    let snapshot = RegistryHandoff {
                        catalog: self.catalog.values().cloned().collect(),
                        outbound_buffer: self.buffer.iter().cloned().collect(),
                    };
                    let _ = reply.send(snapshot);
                    Ok(())
                }
                Command::EndHandoff(handoff) | Command::ResolveConflict(handoff) => {
                    self.apply_handoff(handoff).await;
                    Ok(())
                }
                Command::Die => break,
            };

            if let Err(err) = outcome {
                tracing::error!(scheduler = %self.id, error = %err, "job registry storage failure, stopping actor");
                return;
            }
        }
    }

    async fn handle_add(&mut self, job: Job) -> Result<(), RegistryError> {
        self.storage.add_job(&self.id, &job).await?;
        let active = job.is_active();
        self.catalog.insert(job.name.clone(), job.clone());
        if active {
            self.buffer.push_back(RegistryEvent::Add(job));
        }
        self.release_buffered().await;
        Ok(())
    }

    async fn handle_delete(&mut self, name: String) -> Result<(), RegistryError> {
        let Some(existing) = self.catalog.remove(&name) else {
            return Ok(());
        };
        self.storage.delete_job(&self.id, &name).await?;
        if existing.is_active() {
            self.buffer.push_back(RegistryEvent::Remove(name));
        }
        self.release_buffered().await;
        Ok(())
    }

    async fn handle_change_state(
        &mut self,
        name: String,
        state: JobState,
    ) -> Result<(), RegistryError> {
        let Some(job) = self.catalog.get_mut(&name) else {
            return Ok(());
        };
        if job.state == state {
            return Ok(());
        }
        job.state = state;
        let updated = job.clone();
        self.storage.update_job_state(&self.id, &name, state).await?;
        match state {
            JobState::Active => self.buffer.push_back(RegistryEvent::Add(updated)),
            JobState::Inactive => self.buffer.push_back(RegistryEvent::Remove(name)),
        }
        self.release_buffered().await;
        Ok(())
    }

    async fn handle_delete_all(&mut self) -> Result<(), RegistryError> {
        let removed: Vec<String> = self
            .catalog
            .values()
            .filter(|job| job.is_active())
            .map(|job| job.name.clone())
            .collect();
        self.storage.purge(&self.id).await?;
        self.catalog.clear();
        self.buffer.extend(removed.into_iter().map(RegistryEvent::Remove));
        self.release_buffered().await;
        Ok(())
    }

    async fn apply_handoff(&mut self, handoff: RegistryHandoff) {
        for job in handoff.catalog {
            self.catalog.insert(job.name.clone(), job);
        }
        self.buffer.extend(handoff.outbound_buffer);
        self.release_buffered().await;
    }

    /// Hand off up to `demand` buffered events to the subscriber, FIFO,
    /// decrementing demand per event sent.
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

/// A cloneable handle to a running [`JobRegistry`] actor's mailbox.
#[derive(Clone)]
pub struct JobRegistryHandle {
    tx: mpsc::Sender<Command>,
}

impl JobRegistryHandle {
    async fn cast(&self, cmd: Command) -> Result<(), RegistryGone> {
        self.tx.send(cmd).await.map_err(|_| RegistryGone)
    }

    pub async fn add(&self, job: Job) -> Result<(), RegistryGone> {
        self.cast(Command::Add(job)).await
    }

    pub async fn delete(&self, name: impl Into<String>) -> Result<(), RegistryGone> {
        self.cast(Command::Delete(name.into())).await
    }

    pub async fn change_state(
        &self,
        name: impl Into<String>,
        state: JobState,
    ) -> Result<(), RegistryGone> {
        self.cast(Command::ChangeState(name.into(), state)).await
    }

    pub async fn delete_all(&self) -> Result<(), RegistryGone> {
        self.cast(Command::DeleteAll).await
    }

    pub async fn jobs(&self) -> Result<Vec<Job>, RegistryGone> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::Jobs(reply)).await.map_err(|_| RegistryGone)?;
        rx.await.map_err(|_| RegistryGone)
    }

    pub async fn find(&self, name: impl Into<String>) -> Result<Option<Job>, RegistryGone> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::Find(name.into(), reply)).await.map_err(|_| RegistryGone)?;
        rx.await.map_err(|_| RegistryGone)
    }

    /// Register this caller as the sole downstream subscriber, returning
    /// the receiving half of the event channel.
    pub async fn subscribe(&self, buffer: usize) -> Result<mpsc::Receiver<RegistryEvent>, RegistryGone> {
        let (tx, rx) = mpsc::channel(buffer);
        self.cast(Command::Subscribe(tx)).await?;
        Ok(rx)
    }

    pub async fn demand(&self, n: u64) -> Result<(), RegistryGone> {
        self.cast(Command::Demand(n)).await
    }

    pub async fn begin_handoff(&self) -> Result<RegistryHandoff, RegistryGone> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::BeginHandoff(reply)).await.map_err(|_| RegistryGone)?;
        rx.await.map_err(|_| RegistryGone)
    }

    pub async fn end_handoff(&self, handoff: RegistryHandoff) -> Result<(), RegistryGone> {
        self.cast(Command::EndHandoff(handoff)).await
    }

    pub async fn resolve_conflict(&self, handoff: RegistryHandoff) -> Result<(), RegistryGone> {
        self.cast(Command::ResolveConflict(handoff)).await
    }

    pub async fn die(&self) -> Result<(), RegistryGone> {
        self.cast(Command::Die).await
    }
}

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "command_table_tests.rs"]
mod command_table_tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! Process wiring: construct the two actors over a chosen storage
//! backend, run until a shutdown signal arrives, then tear down in
//! reverse-dependency order.

use std::path::Path;
use std::sync::Arc;

use cronspine_adapters::{SystemCronEvaluator, SystemTimezoneConverter};
use cronspine_broadcaster::ExecutionBroadcaster;
use cronspine_core::SchedulerId;
use cronspine_registry::JobRegistry;
use cronspine_storage::{InMemoryStorage, SledStorage, Storage};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, StorageKind};

/// Failure bringing the daemon up or down.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("storage backend error: {0}")]
    Storage(#[from] cronspine_core::StorageError),
    #[error("registry actor failed to start: {0}")]
    Registry(#[from] cronspine_core::RegistryError),
    #[error("broadcaster actor failed to start: {0}")]
    Broadcast(#[from] cronspine_core::BroadcastError),
    #[error("broadcaster actor exited before startup finished")]
    BroadcasterGone,
}

impl From<cronspine_broadcaster::BroadcasterGone> for SupervisorError {
    fn from(_: cronspine_broadcaster::BroadcasterGone) -> Self {
        SupervisorError::BroadcasterGone
    }
}

fn open_storage(config: &Config, state_dir: &Path) -> Result<Arc<dyn Storage>, SupervisorError> {
    match config.storage {
        StorageKind::Sled => {
            let path = config.sled_path(state_dir);
            info!(path = %path.display(), "opening sled-backed storage");
            Ok(Arc::new(SledStorage::open(path)?))
        }
        StorageKind::Memory => {
            warn!("running with in-memory storage: the watermark and catalog do not survive a restart");
            Ok(Arc::new(InMemoryStorage::default()))
        }
    }
}

/// Run the daemon until `shutdown` resolves, then tear both actors down.
///
/// `shutdown` is a future the caller constructs (typically ctrl-c plus
/// SIGTERM); this function does not know anything about signals itself —
/// that stays in the binary entrypoint, which passes a plain future down.
pub async fn run(
    config: Config,
    state_dir: &Path,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<(), SupervisorError> {
    let scheduler = SchedulerId::new(config.scheduler_id.clone());
    let storage = open_storage(&config, state_dir)?;
    let cron = Arc::new(SystemCronEvaluator);
    let timezones = Arc::new(SystemTimezoneConverter);
    let clock = cronspine_core::SystemClock;

    let registry = JobRegistry::spawn(scheduler.clone(), storage.clone(), Vec::new()).await?;
    info!(scheduler = %scheduler, "job registry started");

    let broadcaster = ExecutionBroadcaster::spawn(
        scheduler.clone(),
        storage,
        clock,
        cron,
        timezones,
        registry.clone(),
        config.upstream_buffer,
    )
    .await?;
    info!("execution broadcaster started");

    let mut events = broadcaster.subscribe(config.downstream_buffer).await?;
    broadcaster.demand(u64::MAX).await?;

    let log_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(job = %event.job.name, "execute");
        }
    });

    shutdown.await;
    info!("shutdown signal received, stopping actors");

    let _ = broadcaster.die().await;
    let _ = registry.die().await;
    log_task.abort();

    Ok(())
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! `cronspined`: thin binary entrypoint. Resolves the state directory,
//! loads configuration, initializes tracing, and hands off to
//! `cronspine_daemon::run` with a shutdown future built from ctrl-c and
//! (on unix) SIGTERM — signal plumbing stays here, everything else in
//! the library.

use cronspine_daemon::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let state_dir = match Config::state_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("cronspined: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let config = match Config::load(&state_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cronspined: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = std::fs::create_dir_all(&state_dir) {
        tracing::error!(error = %e, dir = %state_dir.display(), "failed to create state directory");
        return std::process::ExitCode::FAILURE;
    }

    tracing::info!(dir = %state_dir.display(), "cronspined starting");

    match cronspine_daemon::run(config, &state_dir, shutdown_signal()).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "daemon exited with error");
            std::process::ExitCode::FAILURE
        }
    }
}

/// Resolves on ctrl-c, or on SIGTERM (unix only) — whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler, ctrl-c only");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

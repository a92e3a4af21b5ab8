// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, supervision, shutdown.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use stabilizer_adapters::{
    ConfigStore, ConfigStoreError, FileConfigStore, RuleEvaluator, SseStreamClient, StreamClient,
    TracedRuleEvaluator, TracedWikiApi, WikiApi,
};
use stabilizer_core::{Clock, MessageError, MessageTable, SystemClock};
use stabilizer_engine::{StreamWorker, WorkerDeps, WorkerExit};
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// Worker with the production stream, store and clock (collaborators traced)
pub type DaemonWorker<W, R> = StreamWorker<
    SseStreamClient,
    TracedWikiApi<W>,
    TracedRuleEvaluator<R>,
    FileConfigStore,
    SystemClock,
>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Path to the operational configuration (TOML)
    pub config_path: PathBuf,
    /// Path to the localized message table (JSON)
    pub messages_path: PathBuf,
    /// Path to the daemon log file; stderr when unset
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log path: {0}")]
    InvalidLogPath(PathBuf),

    #[error("failed to install logging: {0}")]
    Logging(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigStoreError),

    #[error("failed to read messages from {path}: {source}")]
    ReadMessages {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to load messages: {0}")]
    Messages(#[from] MessageError),
}

/// Files loaded at startup
pub struct Startup {
    pub store: FileConfigStore,
    pub messages: Arc<MessageTable>,
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered lines on drop and must be held for
/// the lifetime of the process.
pub fn setup_logging(
    log_path: Option<&Path>,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = match log_path {
        Some(path) => {
            let dir = path
                .parent()
                .ok_or_else(|| LifecycleError::InvalidLogPath(path.to_path_buf()))?;
            let file_name = path
                .file_name()
                .ok_or_else(|| LifecycleError::InvalidLogPath(path.to_path_buf()))?;
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    Ok(guard)
}

/// Load the configuration and message table
pub async fn startup(config: &DaemonConfig) -> Result<Startup, LifecycleError> {
    let store = FileConfigStore::load(&config.config_path)?;

    let content = tokio::fs::read_to_string(&config.messages_path)
        .await
        .map_err(|source| LifecycleError::ReadMessages {
            path: config.messages_path.clone(),
            source,
        })?;
    let messages = MessageTable::from_json(&content)?;

    let current = store.current();
    // Every reason used at fire time must exist for the configured locale
    messages.protect_reason(&current.lang, 0)?;

    info!(
        config = %config.config_path.display(),
        site = %current.site_id(),
        mode = %current.mode,
        dry_run = current.dry_run,
        "configuration loaded"
    );

    Ok(Startup {
        store,
        messages: Arc::new(messages),
    })
}

/// Wire the production adapters around the supplied collaborators
pub fn build_worker<W, R>(startup: Startup, wiki: W, rules: R) -> DaemonWorker<W, R>
where
    W: WikiApi,
    R: RuleEvaluator,
{
    StreamWorker::new(WorkerDeps {
        stream: SseStreamClient::new(),
        wiki: TracedWikiApi::new(wiki),
        rules: TracedRuleEvaluator::new(rules),
        config: startup.store,
        clock: SystemClock,
        messages: startup.messages,
    })
}

/// Run a worker until it stops, signaling its cancellation on SIGINT or SIGTERM
pub async fn supervise<T, W, R, S, C>(
    worker: StreamWorker<T, W, R, S, C>,
) -> Result<WorkerExit, LifecycleError>
where
    T: StreamClient,
    W: WikiApi,
    R: RuleEvaluator,
    S: ConfigStore,
    C: Clock,
{
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let cancel = worker.cancellation();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            tokio::select! {
                _ = sigint.recv() => info!("received SIGINT, shutting down..."),
                _ = sigterm.recv() => info!("received SIGTERM, shutting down..."),
                // Worker stopped on its own
                _ = cancel.signaled() => return,
            }
            cancel.signal();
        }
    });

    let exit = worker.run().await;

    // The worker signals on every exit path, which releases the watcher
    cancel.signal();
    if let Err(e) = watcher.await {
        error!(error = %e, "signal watcher failed");
    }

    Ok(exit)
}

/// Process exit status for a worker outcome
pub fn exit_status(exit: &WorkerExit) -> ExitCode {
    match u8::try_from(exit.exit_code()) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Start the daemon and run until shutdown or failure
pub async fn run<W, R>(config: &DaemonConfig, wiki: W, rules: R) -> Result<ExitCode, LifecycleError>
where
    W: WikiApi,
    R: RuleEvaluator,
{
    let startup = match startup(config).await {
        Ok(startup) => startup,
        Err(e) => {
            error!("failed to start daemon: {}", e);
            return Err(e);
        }
    };

    let worker = build_worker(startup, wiki, rules);
    let exit = supervise(worker).await?;

    info!(code = exit.exit_code(), "daemon stopped");
    Ok(exit_status(&exit))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

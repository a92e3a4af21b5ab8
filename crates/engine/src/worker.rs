// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream worker: consumes the change stream and schedules evaluators
//!
//! Each event is filtered, checked for eligibility, deduplicated against the
//! pending set and handed to the rules. A positive answer marks the page
//! pending and spawns an [`Evaluator`] for it.
//!
//! Connection resets reopen the stream up to `max_reconnects` consecutive
//! times; any matching event resets the count. Every other failure ends the
//! worker.

use crate::error::{EvaluatorError, WorkerError};
use crate::{check_eligibility, ConfigRefresher, EvaluationOutcome, Evaluator, EvaluatorContext};
use stabilizer_adapters::{ConfigStore, RuleEvaluator, StreamClient, StreamEvent, WikiApi};
use stabilizer_core::{CancellationToken, ChangeEvent, Clock, Config, MessageTable, PendingSet};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::Instrument;

type EvaluatorResult = Result<EvaluationOutcome, EvaluatorError>;

/// Worker adapter dependencies
pub struct WorkerDeps<T, W, R, S, C> {
    pub stream: T,
    pub wiki: W,
    pub rules: R,
    pub config: S,
    pub clock: C,
    pub messages: Arc<MessageTable>,
}

/// How the worker stopped
#[derive(Debug)]
pub enum WorkerExit {
    /// Cancellation was signaled
    Shutdown,
    /// The stream kept resetting
    ReconnectsExhausted { attempts: u32 },
    /// An unclassified failure
    Fatal(WorkerError),
}

impl WorkerExit {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkerExit::Shutdown => 0,
            WorkerExit::ReconnectsExhausted { .. } | WorkerExit::Fatal(_) => 1,
        }
    }
}

/// Whether a change passes the site, kind and namespace filters
pub fn is_relevant(config: &Config, change: &ChangeEvent) -> bool {
    change.is_edit() && change.wiki == config.site_id() && config.watches_namespace(change.namespace)
}

/// Long-lived consumer of the change stream
pub struct StreamWorker<T, W, R, S, C> {
    stream: T,
    rules: R,
    ctx: EvaluatorContext<W, S, C>,
    reconnects: u32,
    evaluators: JoinSet<EvaluatorResult>,
    /// Page title of each running evaluator task
    titles: HashMap<Id, String>,
}

impl<T, W, R, S, C> StreamWorker<T, W, R, S, C>
where
    T: StreamClient,
    W: WikiApi,
    R: RuleEvaluator,
    S: ConfigStore,
    C: Clock,
{
    pub fn new(deps: WorkerDeps<T, W, R, S, C>) -> Self {
        Self {
            stream: deps.stream,
            rules: deps.rules,
            ctx: EvaluatorContext {
                wiki: deps.wiki,
                config: deps.config,
                clock: deps.clock,
                messages: deps.messages,
                pending: PendingSet::new(),
                cancel: CancellationToken::new(),
            },
            reconnects: 0,
            evaluators: JoinSet::new(),
            titles: HashMap::new(),
        }
    }

    /// Token that stops the worker and everything it started
    pub fn cancellation(&self) -> CancellationToken {
        self.ctx.cancel.clone()
    }

    /// Titles with an evaluator in flight
    pub fn pending(&self) -> PendingSet {
        self.ctx.pending.clone()
    }

    /// Run until cancelled or until a failure ends the worker.
    ///
    /// Starts the configuration refresher and stops it again before returning.
    pub async fn run(mut self) -> WorkerExit {
        let refresher = ConfigRefresher::new(self.ctx.config.clone(), self.ctx.cancel.clone()).spawn();
        tracing::info!("stream worker started");

        let exit = loop {
            match self.consume().await {
                Ok(()) => {
                    tracing::info!("terminating stabilizer...");
                    break WorkerExit::Shutdown;
                }
                Err(e) if e.is_connection_reset() => {
                    let max = self.ctx.config.current().max_reconnects;
                    if self.reconnects >= max {
                        tracing::error!(attempts = self.reconnects, error = %e, "giving up");
                        break WorkerExit::ReconnectsExhausted {
                            attempts: self.reconnects,
                        };
                    }
                    self.reconnects += 1;
                    tracing::error!(
                        attempt = self.reconnects,
                        max,
                        error = %e,
                        "connection error, trying to reconnect..."
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "unexpected error");
                    tracing::error!(details = ?e, "crash report");
                    break WorkerExit::Fatal(e);
                }
            }
        };

        self.ctx.cancel.signal();
        if !matches!(exit, WorkerExit::Shutdown) {
            tracing::info!("terminating tasks");
        }
        if let Err(e) = refresher.await {
            tracing::warn!(error = %e, "config refresher task failed");
        }
        while let Some(result) = self.evaluators.join_next_with_id().await {
            self.finish_evaluator(result);
        }

        exit
    }

    /// Read one connection until it fails. `Ok` means cancellation.
    async fn consume(&mut self) -> Result<(), WorkerError> {
        let url = self.ctx.config.current().stream_url.clone();
        let mut conn = tokio::select! {
            biased;
            _ = self.ctx.cancel.signaled() => return Ok(()),
            conn = self.stream.open(&url) => conn?,
        };
        tracing::info!(url = %url, "stream opened");

        loop {
            let event = tokio::select! {
                biased;
                _ = self.ctx.cancel.signaled() => return Ok(()),
                event = conn.next() => event?,
            };
            self.reap_evaluators();
            self.handle_event(event).await?;
        }
    }

    async fn handle_event(&mut self, event: StreamEvent) -> Result<(), WorkerError> {
        if !event.is_message() {
            return Ok(());
        }
        let Ok(change) = ChangeEvent::parse(&event.data) else {
            tracing::trace!("skipping malformed event");
            return Ok(());
        };

        let config = self.ctx.config.current();
        if !is_relevant(&config, &change) {
            return Ok(());
        }

        // Traffic that passes the filter proves the connection healthy
        self.reconnects = 0;

        self.consider(change).await
    }

    async fn consider(&mut self, change: ChangeEvent) -> Result<(), WorkerError> {
        let eligibility = check_eligibility(&self.ctx.wiki, &change).await?;
        if !eligibility.is_eligible() {
            tracing::trace!(title = %change.title, ?eligibility, "not eligible");
            return Ok(());
        }
        if self.ctx.pending.contains(&change.title) {
            tracing::debug!(title = %change.title, "already pending");
            return Ok(());
        }

        let duration = match self.rules.should_protect(&change).await? {
            Some(duration) if !duration.is_zero() => duration,
            _ => return Ok(()),
        };

        if !self.ctx.pending.try_insert(&change.title) {
            tracing::debug!(title = %change.title, "already pending");
            return Ok(());
        }

        tracing::debug!(
            title = %change.title,
            revision = change.new_revision(),
            duration_secs = duration.as_secs(),
            "scheduled"
        );
        let span = tracing::info_span!(
            "evaluator",
            title = %change.title,
            revision = change.new_revision()
        );
        let title = change.title.clone();
        let evaluator = Evaluator::new(self.ctx.clone(), change, duration);
        let handle = self.evaluators.spawn(evaluator.run().instrument(span));
        self.titles.insert(handle.id(), title);

        Ok(())
    }

    fn reap_evaluators(&mut self) {
        while let Some(result) = self.evaluators.try_join_next_with_id() {
            self.finish_evaluator(result);
        }
    }

    /// Log a finished evaluator. A task that died without returning never
    /// released its title, so it is released here.
    fn finish_evaluator(&mut self, result: Result<(Id, EvaluatorResult), JoinError>) {
        match result {
            Ok((id, Ok(outcome))) => {
                let title = self.titles.remove(&id).unwrap_or_default();
                tracing::debug!(title = %title, ?outcome, "evaluator finished");
            }
            Ok((id, Err(e))) => {
                let title = self.titles.remove(&id).unwrap_or_default();
                tracing::error!(title = %title, error = %e, "evaluator failed");
            }
            Err(e) => match self.titles.remove(&e.id()) {
                Some(title) => {
                    self.ctx.pending.remove(&title);
                    tracing::error!(title = %title, error = %e, "evaluator task aborted");
                }
                None => tracing::error!(error = %e, "evaluator task aborted"),
            },
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;

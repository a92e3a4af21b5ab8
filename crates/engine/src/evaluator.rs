// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled evaluation of one candidate change
//!
//! An evaluator waits out the configured delay, re-checks the page against the
//! wiki, releases the page from the pending set and, if the page is still
//! eligible, protects it.
//!
//! ```text
//! Waiting -> Validating -> Acting    -> Done
//!    |                  \-> Ineligible -> Done
//!    \-> Abandoned (shutdown, title stays pending)
//! ```

use crate::error::EvaluatorError;
use crate::{check_eligibility, Eligibility, TICK};
use stabilizer_adapters::{ConfigStore, WikiApi};
use stabilizer_core::{
    expiry_after, CancellationToken, ChangeEvent, Clock, Config, MessageTable, PendingSet,
};
use std::sync::Arc;
use std::time::Duration;

/// How an evaluator finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// The page was protected
    Protected,
    /// Still eligible, but dry-run mode suppressed the action
    DryRun,
    /// The page stopped being eligible during the wait
    Ineligible(Eligibility),
    /// Shutdown was signaled during the wait
    Abandoned,
}

/// State shared by every evaluator a worker spawns
pub struct EvaluatorContext<W, S, C> {
    pub wiki: W,
    pub config: S,
    pub clock: C,
    pub messages: Arc<MessageTable>,
    pub pending: PendingSet,
    pub cancel: CancellationToken,
}

impl<W: Clone, S: Clone, C: Clone> Clone for EvaluatorContext<W, S, C> {
    fn clone(&self) -> Self {
        Self {
            wiki: self.wiki.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            messages: Arc::clone(&self.messages),
            pending: self.pending.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

/// Delayed protection of a single page
pub struct Evaluator<W, S, C> {
    ctx: EvaluatorContext<W, S, C>,
    change: ChangeEvent,
    duration: Duration,
}

impl<W, S, C> Evaluator<W, S, C>
where
    W: WikiApi,
    S: ConfigStore,
    C: Clock,
{
    /// Create an evaluator for a change whose title is already pending
    pub fn new(ctx: EvaluatorContext<W, S, C>, change: ChangeEvent, duration: Duration) -> Self {
        Self {
            ctx,
            change,
            duration,
        }
    }

    pub fn title(&self) -> &str {
        &self.change.title
    }

    pub async fn run(self) -> Result<EvaluationOutcome, EvaluatorError> {
        if !self.wait().await {
            tracing::debug!("abandoned on shutdown");
            return Ok(EvaluationOutcome::Abandoned);
        }

        let eligibility = check_eligibility(&self.ctx.wiki, &self.change).await;
        // Released whatever the outcome so later edits can be evaluated again
        self.ctx.pending.remove(&self.change.title);

        let eligibility = eligibility?;
        if !eligibility.is_eligible() {
            tracing::debug!(?eligibility, "no longer eligible");
            return Ok(EvaluationOutcome::Ineligible(eligibility));
        }

        let config = self.ctx.config.current();
        if config.dry_run {
            tracing::info!(
                duration_secs = self.duration.as_secs(),
                "dry run: protection suppressed"
            );
            return Ok(EvaluationOutcome::DryRun);
        }

        self.protect(&config).await?;
        Ok(EvaluationOutcome::Protected)
    }

    /// Sleep for the configured delay. Returns `false` if cancelled first.
    async fn wait(&self) -> bool {
        let delay = self.ctx.config.current().delay;
        let mut elapsed = Duration::ZERO;

        while elapsed < delay {
            if self.ctx.cancel.is_signaled() {
                return false;
            }
            let step = TICK.min(delay - elapsed);
            tokio::time::sleep(step).await;
            elapsed += step;
        }
        true
    }

    async fn protect(&self, config: &Config) -> Result<(), EvaluatorError> {
        let expiry = expiry_after(self.ctx.clock.now(), self.duration)
            .ok_or(EvaluatorError::ExpiryOutOfRange(self.duration))?;
        let reason = self
            .ctx
            .messages
            .protect_reason(&config.lang, self.change.new_revision())?;

        self.ctx
            .wiki
            .protect(&self.change.title, &reason, &expiry)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;

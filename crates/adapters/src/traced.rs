// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::rules::{RuleError, RuleEvaluator};
use crate::wiki::{WikiApi, WikiError};
use async_trait::async_trait;
use stabilizer_core::{ChangeEvent, Revision};
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any WikiApi
#[derive(Clone)]
pub struct TracedWikiApi<W> {
    inner: W,
}

impl<W> TracedWikiApi<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W: WikiApi> WikiApi for TracedWikiApi<W> {
    async fn revision(&self, id: u64) -> Result<Option<Revision>, WikiError> {
        let result = self.inner.revision(id).await;
        match &result {
            Ok(found) => tracing::trace!(id, found = found.is_some(), "revision lookup"),
            Err(e) => tracing::warn!(id, error = %e, "revision lookup failed"),
        }
        result
    }

    async fn is_stabilized(&self, title: &str) -> Result<bool, WikiError> {
        let result = self.inner.is_stabilized(title).await;
        tracing::trace!(title, stabilized = ?result.as_ref().ok(), "checked");
        result
    }

    async fn is_flagged_for_review(&self, title: &str) -> Result<bool, WikiError> {
        let result = self.inner.is_flagged_for_review(title).await;
        tracing::trace!(title, flagged = ?result.as_ref().ok(), "checked");
        result
    }

    async fn protect(&self, title: &str, reason: &str, expiry: &str) -> Result<(), WikiError> {
        let span = tracing::info_span!("wiki.protect", title, expiry);

        async move {
            tracing::info!(reason, "protecting");

            let start = std::time::Instant::now();
            let result = self.inner.protect(title, reason, expiry).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "protected"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "protect failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any RuleEvaluator
#[derive(Clone)]
pub struct TracedRuleEvaluator<R> {
    inner: R,
}

impl<R> TracedRuleEvaluator<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: RuleEvaluator> RuleEvaluator for TracedRuleEvaluator<R> {
    async fn should_protect(&self, change: &ChangeEvent) -> Result<Option<Duration>, RuleError> {
        let result = self.inner.should_protect(change).await;
        match &result {
            Ok(Some(duration)) => tracing::debug!(
                title = %change.title,
                revision = change.new_revision(),
                duration_secs = duration.as_secs(),
                "rules matched"
            ),
            Ok(None) => tracing::trace!(title = %change.title, "no rule matched"),
            Err(e) => tracing::error!(title = %change.title, error = %e, "rule evaluation failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

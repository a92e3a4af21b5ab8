// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule evaluation adapter
//!
//! The moderation policy lives outside this workspace. It is consulted once
//! per candidate change and answers how long the page should be protected.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRules;

use async_trait::async_trait;
use stabilizer_core::ChangeEvent;
use std::time::Duration;
use thiserror::Error;

/// Errors from rule evaluation
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule evaluation failed: {0}")]
    Evaluation(String),
}

/// Adapter for the protection policy
#[async_trait]
pub trait RuleEvaluator: Clone + Send + Sync + 'static {
    /// Protection duration for this change, or `None` to leave it alone
    async fn should_protect(&self, change: &ChangeEvent) -> Result<Option<Duration>, RuleError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wiki API adapter
//!
//! The stabilizer only needs four operations from the wiki: a revision
//! lookup, two state queries, and the protection action itself.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWiki, WikiCall};

use async_trait::async_trait;
use stabilizer_core::Revision;
use thiserror::Error;

/// Errors from wiki API operations
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("api error {code}: {info}")]
    Api { code: String, info: String },
}

/// Adapter for wiki API operations
#[async_trait]
pub trait WikiApi: Clone + Send + Sync + 'static {
    /// Look up a revision. `None` if the id is unknown to the wiki.
    async fn revision(&self, id: u64) -> Result<Option<Revision>, WikiError>;

    /// Whether the page is already in the stabilized state
    async fn is_stabilized(&self, title: &str) -> Result<bool, WikiError>;

    /// Whether the page has changes awaiting review
    async fn is_flagged_for_review(&self, title: &str) -> Result<bool, WikiError>;

    /// Stabilize the page until `expiry` (wire timestamp)
    async fn protect(&self, title: &str, reason: &str, expiry: &str) -> Result<(), WikiError>;
}

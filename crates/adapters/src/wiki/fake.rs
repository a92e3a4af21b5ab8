// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake wiki API for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{WikiApi, WikiError};
use async_trait::async_trait;
use stabilizer_core::Revision;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded wiki call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiCall {
    Revision { id: u64 },
    IsStabilized { title: String },
    IsFlaggedForReview { title: String },
    Protect {
        title: String,
        reason: String,
        expiry: String,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct FakePage {
    stabilized: bool,
    flagged: bool,
}

#[derive(Default)]
struct FakeWikiState {
    revisions: HashMap<u64, String>,
    pages: HashMap<String, FakePage>,
    protect_error: Option<String>,
    calls: Vec<WikiCall>,
}

/// Fake wiki with in-memory page state.
///
/// Unknown revisions are reported missing; unknown pages are neither
/// stabilized nor flagged.
#[derive(Clone, Default)]
pub struct FakeWiki {
    state: Arc<Mutex<FakeWikiState>>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a revision of a page
    pub fn add_revision(&self, id: u64, title: &str) {
        self.lock().revisions.insert(id, title.to_string());
    }

    /// Set the review state of a page
    pub fn set_page(&self, title: &str, stabilized: bool, flagged: bool) {
        self.lock()
            .pages
            .insert(title.to_string(), FakePage { stabilized, flagged });
    }

    /// Add a revision of a page that is unstabilized and awaiting review
    pub fn add_eligible(&self, id: u64, title: &str) {
        self.add_revision(id, title);
        self.set_page(title, false, true);
    }

    /// Make every subsequent `protect` call fail
    pub fn fail_protect(&self, message: &str) {
        self.lock().protect_error = Some(message.to_string());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<WikiCall> {
        self.lock().calls.clone()
    }

    /// Recorded `protect` calls only
    pub fn protect_calls(&self) -> Vec<WikiCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, WikiCall::Protect { .. }))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeWikiState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl WikiApi for FakeWiki {
    async fn revision(&self, id: u64) -> Result<Option<Revision>, WikiError> {
        let mut state = self.lock();
        state.calls.push(WikiCall::Revision { id });
        Ok(state.revisions.get(&id).map(|title| Revision {
            id,
            title: title.clone(),
        }))
    }

    async fn is_stabilized(&self, title: &str) -> Result<bool, WikiError> {
        let mut state = self.lock();
        state.calls.push(WikiCall::IsStabilized {
            title: title.to_string(),
        });
        Ok(state.pages.get(title).copied().unwrap_or_default().stabilized)
    }

    async fn is_flagged_for_review(&self, title: &str) -> Result<bool, WikiError> {
        let mut state = self.lock();
        state.calls.push(WikiCall::IsFlaggedForReview {
            title: title.to_string(),
        });
        Ok(state.pages.get(title).copied().unwrap_or_default().flagged)
    }

    async fn protect(&self, title: &str, reason: &str, expiry: &str) -> Result<(), WikiError> {
        let mut state = self.lock();
        state.calls.push(WikiCall::Protect {
            title: title.to_string(),
            reason: reason.to_string(),
            expiry: expiry.to_string(),
        });

        if let Some(message) = &state.protect_error {
            return Err(WikiError::Api {
                code: "permissiondenied".to_string(),
                info: message.clone(),
            });
        }

        // Protecting stabilizes the page and clears the review flag
        state
            .pages
            .insert(title.to_string(), FakePage { stabilized: true, flagged: false });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

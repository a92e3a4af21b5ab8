// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the stabilizer's external collaborators

pub mod config;
pub mod rules;
pub mod stream;
pub mod traced;
pub mod wiki;

pub use config::{ConfigStore, ConfigStoreError, FileConfigStore};
pub use rules::{RuleError, RuleEvaluator};
pub use stream::{SseStreamClient, StreamClient, StreamConnection, StreamError, StreamEvent};
pub use traced::{TracedRuleEvaluator, TracedWikiApi};
pub use wiki::{WikiApi, WikiError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use config::{ConfigCall, FakeConfigStore};
#[cfg(any(test, feature = "test-support"))]
pub use rules::FakeRules;
#[cfg(any(test, feature = "test-support"))]
pub use stream::FakeStream;
#[cfg(any(test, feature = "test-support"))]
pub use wiki::{FakeWiki, WikiCall};

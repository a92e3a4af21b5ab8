// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake rule evaluator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RuleError, RuleEvaluator};
use async_trait::async_trait;
use stabilizer_core::ChangeEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeRulesState {
    default: Option<Duration>,
    per_title: HashMap<String, Option<Duration>>,
    error: Option<String>,
    calls: Vec<ChangeEvent>,
}

/// Fake rule evaluator answering from a fixed table
#[derive(Clone, Default)]
pub struct FakeRules {
    state: Arc<Mutex<FakeRulesState>>,
}

impl FakeRules {
    /// Evaluator that never protects
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator that protects every change for `duration`
    pub fn always(duration: Duration) -> Self {
        let rules = Self::new();
        rules.lock().default = Some(duration);
        rules
    }

    /// Override the answer for one title
    pub fn set_title(&self, title: &str, duration: Option<Duration>) {
        self.lock().per_title.insert(title.to_string(), duration);
    }

    /// Make every subsequent evaluation fail
    pub fn fail(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }

    /// Changes evaluated so far
    pub fn calls(&self) -> Vec<ChangeEvent> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeRulesState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RuleEvaluator for FakeRules {
    async fn should_protect(&self, change: &ChangeEvent) -> Result<Option<Duration>, RuleError> {
        let mut state = self.lock();
        state.calls.push(change.clone());

        if let Some(message) = &state.error {
            return Err(RuleError::Evaluation(message.clone()));
        }

        Ok(state
            .per_title
            .get(&change.title)
            .copied()
            .unwrap_or(state.default))
    }
}

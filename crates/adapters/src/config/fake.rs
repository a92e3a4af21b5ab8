// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake configuration store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConfigStore, ConfigStoreError};
use async_trait::async_trait;
use stabilizer_core::{Config, SharedConfig};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded refresh call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCall {
    Network,
    Local,
}

#[derive(Default)]
struct FakeConfigState {
    /// Configurations applied by successive refreshes
    next: VecDeque<Config>,
    error: Option<String>,
    calls: Vec<ConfigCall>,
}

/// In-memory configuration store recording refresh calls
#[derive(Clone)]
pub struct FakeConfigStore {
    shared: SharedConfig,
    state: Arc<Mutex<FakeConfigState>>,
}

impl FakeConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            shared: SharedConfig::new(config),
            state: Arc::new(Mutex::new(FakeConfigState::default())),
        }
    }

    /// Replace the configuration immediately
    pub fn set(&self, config: Config) {
        self.shared.replace(config);
    }

    /// Queue a configuration to be applied by the next refresh
    pub fn push_refresh(&self, config: Config) {
        self.lock().next.push_back(config);
    }

    /// Make every subsequent refresh fail
    pub fn fail_refresh(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }

    /// Refresh calls made so far
    pub fn calls(&self) -> Vec<ConfigCall> {
        self.lock().calls.clone()
    }

    fn refresh(&self, call: ConfigCall) -> Result<bool, ConfigStoreError> {
        let mut state = self.lock();
        state.calls.push(call);

        if let Some(message) = &state.error {
            return Err(ConfigStoreError::Fetch {
                url: "fake://config".to_string(),
                message: message.clone(),
            });
        }

        Ok(match state.next.pop_front() {
            Some(config) => self.shared.replace(config),
            None => false,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeConfigState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ConfigStore for FakeConfigStore {
    fn current(&self) -> Arc<Config> {
        self.shared.current()
    }

    async fn refresh_from_network(&self) -> Result<bool, ConfigStoreError> {
        self.refresh(ConfigCall::Network)
    }

    async fn refresh_from_local(&self) -> Result<bool, ConfigStoreError> {
        self.refresh(ConfigCall::Local)
    }
}

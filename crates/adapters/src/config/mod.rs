// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration store adapters

mod file;

pub use file::FileConfigStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ConfigCall, FakeConfigStore};

use async_trait::async_trait;
use stabilizer_core::{Config, ConfigError};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors from configuration refreshes
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("online refresh requested but no online_url is configured")]
    NoOnlineUrl,
}

/// Owner of the operational configuration
#[async_trait]
pub trait ConfigStore: Clone + Send + Sync + 'static {
    /// Snapshot of the current configuration
    fn current(&self) -> Arc<Config>;

    /// Re-read configuration from the online source. Returns `true` if it changed.
    async fn refresh_from_network(&self) -> Result<bool, ConfigStoreError>;

    /// Re-read configuration from the local file. Returns `true` if it changed.
    async fn refresh_from_local(&self) -> Result<bool, ConfigStoreError>;
}

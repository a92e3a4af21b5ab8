// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration backed by a local TOML file and an optional online copy

use super::{ConfigStore, ConfigStoreError};
use async_trait::async_trait;
use stabilizer_core::{Config, SharedConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration store reading TOML from disk or over HTTP.
///
/// A failed refresh leaves the previous configuration in place.
#[derive(Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    shared: SharedConfig,
}

impl FileConfigStore {
    /// Load the initial configuration from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigStoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigStoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Config::from_toml(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            shared: SharedConfig::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn apply(&self, content: &str) -> Result<bool, ConfigStoreError> {
        let config = Config::from_toml(content)?;
        let changed = self.shared.replace(config);
        if changed {
            tracing::info!(path = %self.path.display(), "configuration updated");
        }
        Ok(changed)
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    fn current(&self) -> Arc<Config> {
        self.shared.current()
    }

    async fn refresh_from_network(&self) -> Result<bool, ConfigStoreError> {
        let url = self
            .shared
            .current()
            .online_url
            .clone()
            .ok_or(ConfigStoreError::NoOnlineUrl)?;

        let fetch_url = url.clone();
        let body = tokio::task::spawn_blocking(move || fetch(&fetch_url))
            .await
            .map_err(|e| ConfigStoreError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?
            .map_err(|message| ConfigStoreError::Fetch { url, message })?;

        self.apply(&body)
    }

    async fn refresh_from_local(&self) -> Result<bool, ConfigStoreError> {
        let content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ConfigStoreError::Read {
                    path: self.path.clone(),
                    source,
                })?;
        self.apply(&content)
    }
}

fn fetch(url: &str) -> Result<String, String> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| format!("HTTP request failed: {}", e))?;
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| format!("failed to read response: {}", e))
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operational configuration
//!
//! The configuration is replaced wholesale on every refresh. Readers take an
//! `Arc<Config>` snapshot with [`SharedConfig::current`] once per logical
//! operation; two snapshots taken at different times may differ.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;

/// Where configuration refreshes are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    /// Fetch the document from `online_url`
    Online,
    /// Re-read the local configuration file
    Local,
}

impl std::fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigMode::Online => write!(f, "online"),
            ConfigMode::Local => write!(f, "local"),
        }
    }
}

/// Errors from parsing or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0} must not be empty")]
    Empty(&'static str),
    #[error("invalid config: online mode requires online_url")]
    MissingOnlineUrl,
}

/// Operational configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub mode: ConfigMode,
    /// Recent-changes event stream endpoint
    pub stream_url: String,
    /// Wiki language code, e.g. `fi`
    pub lang: String,
    #[serde(default = "default_wiki_suffix")]
    pub wiki_suffix: String,
    /// Namespaces whose edits are considered
    pub namespaces: Vec<i64>,
    /// How long an evaluator waits before re-validating
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    /// Evaluate but never protect
    #[serde(default)]
    pub dry_run: bool,
    /// Consecutive connection resets tolerated before giving up
    #[serde(default = "default_max_reconnects")]
    pub max_reconnects: u32,
    /// Document fetched on online refresh
    #[serde(default)]
    pub online_url: Option<String>,
}

fn default_wiki_suffix() -> String {
    "wiki".to_string()
}

fn default_max_reconnects() -> u32 {
    5
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream_url.trim().is_empty() {
            return Err(ConfigError::Empty("stream_url"));
        }
        if self.lang.trim().is_empty() {
            return Err(ConfigError::Empty("lang"));
        }
        if self.namespaces.is_empty() {
            return Err(ConfigError::Empty("namespaces"));
        }
        if self.mode == ConfigMode::Online && self.online_url.is_none() {
            return Err(ConfigError::MissingOnlineUrl);
        }
        Ok(())
    }

    /// Site identifier events must carry, e.g. `fiwiki`
    pub fn site_id(&self) -> String {
        format!("{}{}", self.lang, self.wiki_suffix)
    }

    pub fn watches_namespace(&self, namespace: i64) -> bool {
        self.namespaces.contains(&namespace)
    }
}

/// Shared handle to the current configuration snapshot
#[derive(Debug, Clone)]
pub struct SharedConfig {
    current: Arc<RwLock<Arc<Config>>>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Snapshot of the configuration at this moment
    pub fn current(&self) -> Arc<Config> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Swap in a new configuration. Returns `true` if it differs from the old one.
    pub fn replace(&self, config: Config) -> bool {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        if **current == config {
            return false;
        }
        *current = Arc::new(config);
        true
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic configuration refresh

use crate::{REFRESH_PERIOD, TICK};
use stabilizer_adapters::ConfigStore;
use stabilizer_core::{CancellationToken, ConfigMode};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Background loop re-reading the configuration every [`REFRESH_PERIOD`].
///
/// Time is accumulated in [`TICK`] steps so cancellation is seen within one
/// tick, or one tick plus a refresh call if one is in progress. The first
/// refresh happens immediately.
pub struct ConfigRefresher<S> {
    store: S,
    cancel: CancellationToken,
}

impl<S: ConfigStore> ConfigRefresher<S> {
    pub fn new(store: S, cancel: CancellationToken) -> Self {
        Self { store, cancel }
    }

    /// Run on a new task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        let mode = self.store.current().mode;
        tracing::info!(%mode, "{} config mode enabled", mode);

        let mut elapsed = REFRESH_PERIOD;
        loop {
            if self.cancel.is_signaled() {
                break;
            }
            if elapsed >= REFRESH_PERIOD {
                elapsed = Duration::ZERO;
                self.refresh().await;
            }
            if self.cancel.is_signaled() {
                break;
            }

            tokio::time::sleep(TICK).await;
            elapsed += TICK;
        }

        tracing::debug!("config refresher stopped");
    }

    async fn refresh(&self) {
        // Mode may itself change between refreshes
        let mode = self.store.current().mode;
        let result = match mode {
            ConfigMode::Online => self.store.refresh_from_network().await,
            ConfigMode::Local => self.store.refresh_from_local().await,
        };

        match result {
            Ok(true) => tracing::info!(%mode, "configuration refreshed"),
            Ok(false) => tracing::trace!(%mode, "configuration unchanged"),
            Err(e) => tracing::warn!(%mode, error = %e, "configuration refresh failed"),
        }
    }
}

#[cfg(test)]
#[path = "refresher_tests.rs"]
mod tests;

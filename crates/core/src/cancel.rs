// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared cancellation flag observed by every background loop
//!
//! Loops either poll [`CancellationToken::is_signaled`] between ticks or await
//! [`CancellationToken::signaled`] alongside blocking I/O. Once set, the flag
//! is never cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    flag: AtomicBool,
    notify: Notify,
}

/// Write-once shutdown flag, cheap to clone and share between tasks
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every task waiting in [`Self::signaled`].
    ///
    /// Calling this more than once has no further effect.
    pub fn signal(&self) {
        if !self.inner.flag.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Current state of the flag
    pub fn is_signaled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Resolve once the flag has been set
    pub async fn signaled(&self) {
        loop {
            // Register before checking so a concurrent signal() cannot be missed
            let notified = self.inner.notify.notified();
            if self.is_signaled() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Set of page titles with a scheduled evaluation in flight
//!
//! Every operation takes the lock for its own duration only. Check-and-insert
//! is a single operation so two events for the same title cannot both win.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Deduplication set shared between the stream worker and its evaluators
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    titles: Arc<Mutex<HashSet<String>>>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a title. Returns `false` if it was already pending.
    pub fn try_insert(&self, title: &str) -> bool {
        self.titles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(title.to_string())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(title)
    }

    /// Remove a title. Returns `true` if it was present.
    pub fn remove(&self, title: &str) -> bool {
        self.titles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(title)
    }

    pub fn len(&self) -> usize {
        self.titles.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the current titles
    pub fn titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .titles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect();
        titles.sort();
        titles
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;

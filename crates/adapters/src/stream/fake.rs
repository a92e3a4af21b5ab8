// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake stream client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StreamClient, StreamConnection, StreamError, StreamEvent, StreamSender};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeStreamState {
    /// Connections handed out by successive `open` calls
    queued: VecDeque<Result<StreamConnection, StreamError>>,
    /// Senders kept alive so scripted connections stay open once drained
    held: Vec<StreamSender>,
    opened: Vec<String>,
}

/// Fake stream client with scripted connections.
///
/// Each `open` call takes the next queued connection. Once the queue is empty
/// it returns an idle connection that never yields.
#[derive(Clone, Default)]
pub struct FakeStream {
    state: Arc<Mutex<FakeStreamState>>,
}

impl FakeStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a connection that yields `items` and then stays open
    pub fn push_connection(&self, items: Vec<Result<StreamEvent, StreamError>>) {
        let tx = self.push_items(items);
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .held
            .push(tx);
    }

    /// Queue a connection that yields `items` and then closes
    pub fn push_closing_connection(&self, items: Vec<Result<StreamEvent, StreamError>>) {
        drop(self.push_items(items));
    }

    /// Queue a connection fed live by the returned sender
    pub fn push_live_connection(&self) -> StreamSender {
        let (tx, conn) = StreamConnection::channel(64);
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .queued
            .push_back(Ok(conn));
        tx
    }

    /// Queue a failed `open` call
    pub fn push_open_error(&self, error: StreamError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .queued
            .push_back(Err(error));
    }

    /// URLs passed to `open`, in call order
    pub fn opened(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .opened
            .clone()
    }

    fn push_items(&self, items: Vec<Result<StreamEvent, StreamError>>) -> StreamSender {
        let (tx, conn) = StreamConnection::channel(items.len() + 1);
        for item in items {
            // Capacity covers every item
            let _ = tx.try_send(item);
        }
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .queued
            .push_back(Ok(conn));
        tx
    }
}

#[async_trait]
impl StreamClient for FakeStream {
    async fn open(&self, url: &str) -> Result<StreamConnection, StreamError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.opened.push(url.to_string());

        match state.queued.pop_front() {
            Some(result) => result,
            None => {
                let (tx, conn) = StreamConnection::channel(1);
                state.held.push(tx);
                Ok(conn)
            }
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

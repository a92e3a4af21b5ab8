// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change stream adapters
//!
//! A [`StreamClient`] opens an endpoint and hands back a [`StreamConnection`]:
//! an ordered, lazy sequence of named events. A connection ends with an error
//! or by closing; either way the caller decides whether to open a new one.

mod sse;

pub use sse::{SseParser, SseStreamClient};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStream;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Event name carrying change payloads
pub const MESSAGE_EVENT: &str = "message";

/// One named event from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub name: String,
    pub data: String,
}

impl StreamEvent {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// A `message` event with the given payload
    pub fn message(data: impl Into<String>) -> Self {
        Self::new(MESSAGE_EVENT, data)
    }

    pub fn is_message(&self) -> bool {
        self.name == MESSAGE_EVENT
    }
}

/// Errors from stream operations
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("connection reset: {0}")]
    ConnectionReset(String),
    #[error("stream closed by server")]
    Closed,
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("stream read failed: {0}")]
    Read(String),
}

impl StreamError {
    /// Whether re-opening the stream is expected to help
    pub fn is_connection_reset(&self) -> bool {
        matches!(self, StreamError::ConnectionReset(_) | StreamError::Closed)
    }
}

/// Sending half used by stream producers
pub type StreamSender = mpsc::Sender<Result<StreamEvent, StreamError>>;

/// An open stream
#[derive(Debug)]
pub struct StreamConnection {
    rx: mpsc::Receiver<Result<StreamEvent, StreamError>>,
}

impl StreamConnection {
    /// Create a connection and the sender that feeds it
    pub fn channel(capacity: usize) -> (StreamSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }

    /// Next event, or `Err(StreamError::Closed)` once the producer is gone
    pub async fn next(&mut self) -> Result<StreamEvent, StreamError> {
        match self.rx.recv().await {
            Some(item) => item,
            None => Err(StreamError::Closed),
        }
    }
}

/// Adapter for opening the change stream
#[async_trait]
pub trait StreamClient: Clone + Send + Sync + 'static {
    /// Open a new connection to `url`
    async fn open(&self, url: &str) -> Result<StreamConnection, StreamError>;
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use stabilizer_adapters::{RuleError, StreamError, WikiError};
use stabilizer_core::MessageError;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a pass of the stream worker's main loop
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
    #[error("wiki error: {0}")]
    Wiki(#[from] WikiError),
    #[error("rules error: {0}")]
    Rules(#[from] RuleError),
}

impl WorkerError {
    /// Whether the worker should reopen the stream and carry on
    pub fn is_connection_reset(&self) -> bool {
        matches!(self, WorkerError::Stream(e) if e.is_connection_reset())
    }
}

/// Errors that end a single evaluator
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("wiki error: {0}")]
    Wiki(#[from] WikiError),
    #[error("reason error: {0}")]
    Message(#[from] MessageError),
    #[error("protection duration out of range: {0:?}")]
    ExpiryOutOfRange(Duration),
}

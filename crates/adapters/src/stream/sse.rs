// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-Sent Events client over blocking HTTP
//!
//! The HTTP body is read on a dedicated thread and forwarded to the async side
//! through the connection channel. Dropping the [`StreamConnection`] makes the
//! next send fail, which ends the thread and closes the HTTP response.

use super::{StreamClient, StreamConnection, StreamError, StreamEvent, StreamSender, MESSAGE_EVENT};
use async_trait::async_trait;
use std::io::{BufRead, BufReader, ErrorKind};
use std::sync::{Arc, Mutex};

/// Buffered events between the reader thread and the worker
const CHANNEL_CAPACITY: usize = 256;

/// Incremental parser for the `text/event-stream` line format
#[derive(Debug, Default)]
pub struct SseParser {
    event: Option<String>,
    data: Vec<String>,
    last_id: Option<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminator). Returns an event when a blank
    /// line completes one.
    pub fn feed_line(&mut self, line: &str) -> Option<StreamEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.last_id = Some(value.to_string()),
            // retry and unknown fields
            _ => {}
        }
        None
    }

    /// Id of the most recent event that carried one
    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    fn dispatch(&mut self) -> Option<StreamEvent> {
        let name = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = self.data.join("\n");
        self.data.clear();
        Some(StreamEvent {
            name: name.unwrap_or_else(|| MESSAGE_EVENT.to_string()),
            data,
        })
    }
}

/// SSE stream client backed by ureq
///
/// Remembers the last event id seen so a reopened connection resumes where
/// the previous one stopped.
#[derive(Clone, Default)]
pub struct SseStreamClient {
    last_id: Arc<Mutex<Option<String>>>,
}

impl SseStreamClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StreamClient for SseStreamClient {
    async fn open(&self, url: &str) -> Result<StreamConnection, StreamError> {
        let (tx, conn) = StreamConnection::channel(CHANNEL_CAPACITY);
        let url = url.to_string();
        let last_id = Arc::clone(&self.last_id);

        std::thread::Builder::new()
            .name("sse-reader".to_string())
            .spawn(move || read_stream(&url, &last_id, &tx))
            .map_err(|e| StreamError::Connect(format!("failed to start reader: {}", e)))?;

        Ok(conn)
    }
}

fn read_stream(url: &str, last_id: &Mutex<Option<String>>, tx: &StreamSender) {
    let resume_from = last_id.lock().unwrap_or_else(|e| e.into_inner()).clone();

    let mut request = ureq::get(url).header("Accept", "text/event-stream");
    if let Some(id) = &resume_from {
        request = request.header("Last-Event-ID", id.as_str());
    }

    let response = match request.call() {
        Ok(response) => response,
        Err(e) => {
            let _ = tx.blocking_send(Err(classify_http_error(e)));
            return;
        }
    };
    tracing::debug!(url, resumed = resume_from.is_some(), "event stream connected");

    forward_events(BufReader::new(response.into_body().into_reader()), last_id, tx);
}

/// Parse the event stream from `reader` and forward each event to `tx`.
///
/// Lines are decoded lossily: a payload with invalid UTF-8 is forwarded with
/// replacement characters and left for the consumer to reject.
fn forward_events(mut reader: impl BufRead, last_id: &Mutex<Option<String>>, tx: &StreamSender) {
    let mut parser = SseParser::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                let _ = tx.blocking_send(Err(classify_io_error(&e)));
                return;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.strip_suffix('\n').unwrap_or(&line);

        if let Some(event) = parser.feed_line(line) {
            if let Some(id) = parser.last_id() {
                *last_id.lock().unwrap_or_else(|e| e.into_inner()) = Some(id.to_string());
            }
            if tx.blocking_send(Ok(event)).is_err() {
                // Receiver dropped: connection no longer wanted
                return;
            }
        }
    }

    let _ = tx.blocking_send(Err(StreamError::Closed));
}

fn classify_http_error(err: ureq::Error) -> StreamError {
    match err {
        ureq::Error::Io(e) => classify_io_error(&e),
        other => StreamError::Connect(other.to_string()),
    }
}

fn classify_io_error(err: &std::io::Error) -> StreamError {
    match err.kind() {
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::UnexpectedEof => StreamError::ConnectionReset(err.to_string()),
        _ => StreamError::Read(err.to_string()),
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;

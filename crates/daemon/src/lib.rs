// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stabilizer daemon
//!
//! Process lifecycle around the stream worker: logging, loading files from
//! disk, signal handling and the process exit status. The wiki API and rule
//! evaluation are supplied by the embedding binary, whose `main` calls
//! [`setup_logging`] and then [`run`], holding the logging guard until exit.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod lifecycle;

pub use lifecycle::{
    build_worker, exit_status, run, setup_logging, startup, supervise, DaemonConfig,
    DaemonWorker, LifecycleError, Startup,
};

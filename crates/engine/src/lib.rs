// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Stabilizer engine: stream consumption and delayed protection

mod eligibility;
mod error;
mod evaluator;
mod refresher;
mod worker;

pub use eligibility::{check_eligibility, Eligibility};
pub use error::{EvaluatorError, WorkerError};
pub use evaluator::{EvaluationOutcome, Evaluator, EvaluatorContext};
pub use refresher::ConfigRefresher;
pub use worker::{is_relevant, StreamWorker, WorkerDeps, WorkerExit};

use std::time::Duration;

/// Polling granularity of every background loop
pub const TICK: Duration = Duration::from_millis(500);

/// How often the configuration is re-read
pub const REFRESH_PERIOD: Duration = Duration::from_secs(30);

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stabilizer-core: Core library for the stabilizer daemon
//!
//! This crate provides:
//! - Change events as delivered by the recent-changes stream
//! - Operational configuration and its shared, swappable snapshot
//! - The cancellation token and pending set shared across tasks
//! - Clock abstraction and localized reason messages

pub mod cancel;
pub mod change;
pub mod clock;
pub mod config;
pub mod messages;
pub mod pending;

// Re-exports
pub use cancel::CancellationToken;
pub use change::{ChangeEvent, Revision, RevisionIds};
pub use clock::{expiry_after, wire_timestamp, Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, ConfigMode, SharedConfig};
pub use messages::{diff_link, MessageError, MessageTable, PROTECT_REASON};
pub use pending::PendingSet;

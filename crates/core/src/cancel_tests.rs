// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn new_token_is_not_signaled() {
    let token = CancellationToken::new();
    assert!(!token.is_signaled());
}

#[test]
fn signal_is_visible_through_clones() {
    let token = CancellationToken::new();
    let other = token.clone();

    other.signal();

    assert!(token.is_signaled());
    assert!(other.is_signaled());
}

#[test]
fn signal_is_idempotent() {
    let token = CancellationToken::new();
    token.signal();
    token.signal();
    assert!(token.is_signaled());
}

#[tokio::test]
async fn signaled_resolves_immediately_when_already_set() {
    let token = CancellationToken::new();
    token.signal();

    tokio::time::timeout(Duration::from_secs(1), token.signaled())
        .await
        .unwrap();
}

#[tokio::test]
async fn signaled_wakes_waiting_task() {
    let token = CancellationToken::new();
    let waiter = {
        let token = token.clone();
        tokio::spawn(async move { token.signaled().await })
    };

    tokio::task::yield_now().await;
    token.signal();

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use stabilizer_adapters::{FakeConfigStore, FakeWiki, WikiCall};
use stabilizer_core::{ConfigMode, FakeClock, PROTECT_REASON};

const DELAY: Duration = Duration::from_secs(600);
const DAY: Duration = Duration::from_secs(24 * 3600);

struct Harness {
    wiki: FakeWiki,
    store: FakeConfigStore,
    ctx: EvaluatorContext<FakeWiki, FakeConfigStore, FakeClock>,
}

fn config() -> Config {
    Config {
        mode: ConfigMode::Local,
        stream_url: "https://stream.test/recentchange".to_string(),
        lang: "fi".to_string(),
        wiki_suffix: "wiki".to_string(),
        namespaces: vec![0],
        delay: DELAY,
        dry_run: false,
        max_reconnects: 5,
        online_url: None,
    }
}

fn harness() -> Harness {
    let wiki = FakeWiki::new();
    let store = FakeConfigStore::new(config());
    let clock = FakeClock::at(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());

    let mut messages = MessageTable::default();
    messages.insert_reason("fi", PROTECT_REASON, "Automaattinen vakautus {{ link }}");

    let ctx = EvaluatorContext {
        wiki: wiki.clone(),
        config: store.clone(),
        clock,
        messages: Arc::new(messages),
        pending: PendingSet::new(),
        cancel: CancellationToken::new(),
    };
    Harness { wiki, store, ctx }
}

fn change() -> ChangeEvent {
    ChangeEvent::edit("fiwiki", 0, "Helsinki", Some(100), 101)
}

fn evaluator(h: &Harness, duration: Duration) -> Evaluator<FakeWiki, FakeConfigStore, FakeClock> {
    h.ctx.pending.try_insert("Helsinki");
    Evaluator::new(h.ctx.clone(), change(), duration)
}

#[tokio::test(start_paused = true)]
async fn protects_eligible_page_after_delay() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");

    let outcome = evaluator(&h, DAY).run().await.unwrap();

    assert_eq!(outcome, EvaluationOutcome::Protected);
    assert_eq!(
        h.wiki.protect_calls(),
        vec![WikiCall::Protect {
            title: "Helsinki".to_string(),
            reason: "Automaattinen vakautus [[Special:Diff/101|101]]".to_string(),
            expiry: "2024-03-02T08:00:00Z".to_string(),
        }]
    );
    assert!(!h.ctx.pending.contains("Helsinki"));
}

#[tokio::test(start_paused = true)]
async fn does_not_validate_before_delay_elapses() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    let handle = tokio::spawn(evaluator(&h, DAY).run());

    tokio::time::sleep(DELAY - Duration::from_secs(1)).await;
    assert!(h.wiki.calls().is_empty());
    assert!(h.ctx.pending.contains("Helsinki"));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(handle.is_finished());
    assert_eq!(h.wiki.protect_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn page_stabilized_during_wait_is_left_alone() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    let handle = tokio::spawn(evaluator(&h, DAY).run());

    tokio::time::sleep(Duration::from_secs(60)).await;
    h.wiki.set_page("Helsinki", true, false);

    let outcome = handle.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        EvaluationOutcome::Ineligible(Eligibility::Stabilized)
    );
    assert!(h.wiki.protect_calls().is_empty());
    assert!(!h.ctx.pending.contains("Helsinki"));
}

#[tokio::test(start_paused = true)]
async fn page_no_longer_flagged_is_left_alone() {
    let h = harness();
    h.wiki.add_revision(101, "Helsinki");
    h.wiki.set_page("Helsinki", false, false);

    let outcome = evaluator(&h, DAY).run().await.unwrap();

    assert_eq!(
        outcome,
        EvaluationOutcome::Ineligible(Eligibility::NotFlagged)
    );
    assert!(h.ctx.pending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn dry_run_validates_but_does_not_protect() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    let mut dry = config();
    dry.dry_run = true;
    h.store.set(dry);

    let outcome = evaluator(&h, DAY).run().await.unwrap();

    assert_eq!(outcome, EvaluationOutcome::DryRun);
    assert!(h.wiki.calls().contains(&WikiCall::Revision { id: 101 }));
    assert!(h.wiki.protect_calls().is_empty());
    assert!(h.ctx.pending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_wait_abandons_without_cleanup() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    let handle = tokio::spawn(evaluator(&h, DAY).run());

    tokio::time::sleep(Duration::from_secs(10)).await;
    h.ctx.cancel.signal();

    let outcome = tokio::time::timeout(TICK * 2, handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(outcome, EvaluationOutcome::Abandoned);
    assert!(h.wiki.calls().is_empty());
    assert!(h.ctx.pending.contains("Helsinki"));
}

#[tokio::test(start_paused = true)]
async fn failed_protect_is_reported_and_releases_page() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    h.wiki.fail_protect("permission denied");

    let result = evaluator(&h, DAY).run().await;

    assert!(matches!(result, Err(EvaluatorError::Wiki(_))));
    assert!(h.ctx.pending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_reason_template_fails_before_protecting() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    let mut swedish = config();
    swedish.lang = "sv".to_string();
    h.store.set(swedish);

    let result = evaluator(&h, DAY).run().await;

    assert!(matches!(result, Err(EvaluatorError::Message(_))));
    assert!(h.wiki.protect_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unrepresentable_duration_is_an_error() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");

    let result = evaluator(&h, Duration::MAX).run().await;

    assert!(matches!(result, Err(EvaluatorError::ExpiryOutOfRange(_))));
    assert!(h.wiki.protect_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_delay_validates_immediately() {
    let h = harness();
    h.wiki.add_eligible(101, "Helsinki");
    let mut immediate = config();
    immediate.delay = Duration::ZERO;
    h.store.set(immediate);

    let ev = evaluator(&h, DAY);
    assert_eq!(ev.title(), "Helsinki");
    assert_eq!(ev.run().await.unwrap(), EvaluationOutcome::Protected);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stabilizer_adapters::{FakeWiki, WikiCall};

fn change() -> ChangeEvent {
    ChangeEvent::edit("fiwiki", 0, "Helsinki", Some(100), 101)
}

#[tokio::test]
async fn eligible_when_unstabilized_and_flagged() {
    let wiki = FakeWiki::new();
    wiki.add_eligible(101, "Helsinki");

    assert_eq!(
        check_eligibility(&wiki, &change()).await.unwrap(),
        Eligibility::Eligible
    );
}

#[tokio::test]
async fn missing_revision_stops_before_page_queries() {
    let wiki = FakeWiki::new();
    wiki.set_page("Helsinki", false, true);

    assert_eq!(
        check_eligibility(&wiki, &change()).await.unwrap(),
        Eligibility::MissingRevision
    );
    assert_eq!(wiki.calls(), vec![WikiCall::Revision { id: 101 }]);
}

#[tokio::test]
async fn stabilized_page_is_not_eligible() {
    let wiki = FakeWiki::new();
    wiki.add_revision(101, "Helsinki");
    wiki.set_page("Helsinki", true, true);

    let eligibility = check_eligibility(&wiki, &change()).await.unwrap();
    assert_eq!(eligibility, Eligibility::Stabilized);
    assert!(!eligibility.is_eligible());
}

#[tokio::test]
async fn unflagged_page_is_not_eligible() {
    let wiki = FakeWiki::new();
    wiki.add_revision(101, "Helsinki");
    wiki.set_page("Helsinki", false, false);

    assert_eq!(
        check_eligibility(&wiki, &change()).await.unwrap(),
        Eligibility::NotFlagged
    );
}

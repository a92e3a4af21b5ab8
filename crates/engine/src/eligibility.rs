// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Eligibility of a change for stabilization

use stabilizer_adapters::{WikiApi, WikiError};
use stabilizer_core::ChangeEvent;

/// Result of checking a change against the wiki's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// The wiki does not know the new revision (deleted or suppressed)
    MissingRevision,
    /// The page is already stabilized
    Stabilized,
    /// The page has nothing awaiting review
    NotFlagged,
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Eligibility::Eligible
    }
}

/// Query the wiki for the change's current eligibility.
///
/// Always asks the wiki; nothing captured earlier is trusted.
pub async fn check_eligibility<W: WikiApi>(
    wiki: &W,
    change: &ChangeEvent,
) -> Result<Eligibility, WikiError> {
    if wiki.revision(change.new_revision()).await?.is_none() {
        return Ok(Eligibility::MissingRevision);
    }
    if wiki.is_stabilized(&change.title).await? {
        return Ok(Eligibility::Stabilized);
    }
    if !wiki.is_flagged_for_review(&change.title).await? {
        return Ok(Eligibility::NotFlagged);
    }
    Ok(Eligibility::Eligible)
}

#[cfg(test)]
#[path = "eligibility_tests.rs"]
mod tests;

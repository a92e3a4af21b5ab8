// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change events from the recent-changes stream

use serde::{Deserialize, Serialize};

/// Change kind that is considered for stabilization
pub const EDIT_KIND: &str = "edit";

/// Old and new revision ids of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionIds {
    /// Absent for the first revision of a page
    #[serde(default)]
    pub old: Option<u64>,
    pub new: u64,
}

/// One notification from the change stream.
///
/// Only the fields the worker reads are kept; everything else in the payload
/// is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Site identifier, e.g. `fiwiki`
    pub wiki: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub namespace: i64,
    pub title: String,
    pub revision: RevisionIds,
}

impl ChangeEvent {
    /// Build an edit event
    pub fn edit(
        wiki: impl Into<String>,
        namespace: i64,
        title: impl Into<String>,
        old: Option<u64>,
        new: u64,
    ) -> Self {
        Self {
            wiki: wiki.into(),
            kind: EDIT_KIND.to_string(),
            namespace,
            title: title.into(),
            revision: RevisionIds { old, new },
        }
    }

    /// Parse a stream payload
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn is_edit(&self) -> bool {
        self.kind == EDIT_KIND
    }

    /// Id of the revision this change produced
    pub fn new_revision(&self) -> u64 {
        self.revision.new
    }
}

/// Canonical revision record returned by the wiki API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: u64,
    pub title: String,
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;

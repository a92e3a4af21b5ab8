// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Localized reason messages.
//!
//! The table is a JSON document keyed by locale:
//!
//! ```json
//! { "fi": { "reasons": { "auto_stabilize": "Automaattinen vakautus ({{ link }})" } } }
//! ```
//!
//! Templates are rendered with minijinja. The protection reason receives
//! `revision` (the new revision id) and `link` (a diff link to it).

use minijinja::{context, Environment, UndefinedBehavior};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Name of the reason template used when protecting a page
pub const PROTECT_REASON: &str = "auto_stabilize";

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid message table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no messages for locale: {0}")]
    UnknownLocale(String),
    #[error("no reason '{name}' for locale {locale}")]
    UnknownReason { locale: String, name: String },
    #[error("failed to render reason: {0}")]
    Render(String),
}

impl From<minijinja::Error> for MessageError {
    fn from(err: minijinja::Error) -> Self {
        MessageError::Render(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LocaleMessages {
    #[serde(default)]
    reasons: HashMap<String, String>,
}

/// Reason templates for every configured locale
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MessageTable {
    locales: HashMap<String, LocaleMessages>,
}

impl MessageTable {
    pub fn from_json(content: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Add or replace a reason template
    pub fn insert_reason(
        &mut self,
        locale: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
    ) {
        self.locales
            .entry(locale.into())
            .or_default()
            .reasons
            .insert(name.into(), template.into());
    }

    /// Raw template for a named reason
    pub fn reason(&self, locale: &str, name: &str) -> Result<&str, MessageError> {
        let messages = self
            .locales
            .get(locale)
            .ok_or_else(|| MessageError::UnknownLocale(locale.to_string()))?;
        messages
            .reasons
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| MessageError::UnknownReason {
                locale: locale.to_string(),
                name: name.to_string(),
            })
    }

    /// Render the protection reason referencing the triggering revision
    pub fn protect_reason(&self, locale: &str, revision: u64) -> Result<String, MessageError> {
        let template = self.reason(locale, PROTECT_REASON)?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        let rendered = env.render_str(
            template,
            context! {
                revision => revision,
                link => diff_link(revision),
            },
        )?;
        Ok(rendered)
    }
}

/// Wiki link to the diff of a revision
pub fn diff_link(revision: u64) -> String {
    format!("[[Special:Diff/{revision}|{revision}]]")
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;

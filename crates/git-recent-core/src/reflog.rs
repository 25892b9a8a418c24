// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! HEAD reflog entries and reference-target extraction
//!
//! Entries are produced by the git library; this module only interprets them.
//! The reference a HEAD update moved to is recovered from the checkout message
//! git writes for every branch switch:
//!
//! ```text
//! checkout: moving from <previous> to <target>
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of hex digits used for abbreviated commit ids
pub const SHORT_ID_LEN: usize = 7;

const CHECKOUT_PREFIX: &str = "checkout: moving from ";
const CHECKOUT_SEPARATOR: &str = " to ";

/// One recorded change of HEAD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflogEntry {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Commit id HEAD pointed at before the change (hex)
    pub old_id: String,
    /// Commit id HEAD points at after the change (hex)
    pub new_id: String,
    /// Reflog message, if one was recorded
    pub message: Option<String>,
}

/// What HEAD was moved to by a checkout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefTarget {
    /// A named reference (usually a local branch)
    Branch(String),
    /// A commit checked out directly; holds the abbreviated id
    Detached(String),
}

impl RefTarget {
    /// The display name of the target
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Detached(name) => name,
        }
    }

    /// Consume the target, returning its display name
    #[must_use]
    pub fn into_name(self) -> String {
        match self {
            Self::Branch(name) | Self::Detached(name) => name,
        }
    }

    /// Whether the target is a detached commit
    #[must_use]
    pub fn is_detached(&self) -> bool {
        matches!(self, Self::Detached(_))
    }
}

/// The two sides of a parsed checkout message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutMove<'a> {
    /// Where HEAD was before the checkout
    pub from: &'a str,
    /// What the user checked out
    pub to: &'a str,
}

/// Parse a `checkout: moving from <a> to <b>` message
///
/// Returns `None` for any other message, including truncated checkout lines.
#[must_use]
pub fn parse_checkout(message: &str) -> Option<CheckoutMove<'_>> {
    let rest = message.trim_end().strip_prefix(CHECKOUT_PREFIX)?;
    let (from, to) = rest.split_once(CHECKOUT_SEPARATOR)?;
    if from.is_empty() || to.is_empty() {
        return None;
    }
    // Ref names and revision expressions never contain whitespace.
    if from.contains(char::is_whitespace) || to.contains(char::is_whitespace) {
        return None;
    }
    Some(CheckoutMove { from, to })
}

/// Whether `s` looks like a (possibly abbreviated) object id
#[must_use]
pub fn is_object_id(s: &str) -> bool {
    (4..=40).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether a checkout side names a revision expression rather than a branch
///
/// Branch names cannot contain `~`, `^`, `:` or `@{`, so any of those marks a
/// revision that git resolves to a detached HEAD.
fn is_revision_expression(name: &str) -> bool {
    name == "HEAD" || name.contains(['~', '^', ':']) || name.contains("@{")
}

/// Abbreviated form of a full commit id, or `None` if it is not usable
fn short_id(id: &str) -> Option<&str> {
    if id.len() < SHORT_ID_LEN || !is_object_id(id) || id.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(&id[..SHORT_ID_LEN])
}

/// Classify one side of a checkout message
///
/// `id` is the commit HEAD pointed at on that side. A hex name only counts as
/// a commit when `id` starts with it, so branches such as `1234` stay branches.
fn classify(name: &str, id: &str) -> Option<RefTarget> {
    let abbreviates_id = is_object_id(name)
        && id
            .get(..name.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name));
    if abbreviates_id || is_revision_expression(name) {
        short_id(id).map(|short| RefTarget::Detached(short.to_string()))
    } else {
        Some(RefTarget::Branch(name.to_string()))
    }
}

impl ReflogEntry {
    /// Create an entry from its raw parts
    #[must_use]
    pub fn new(
        timestamp: i64,
        old_id: impl Into<String>,
        new_id: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            old_id: old_id.into(),
            new_id: new_id.into(),
            message,
        }
    }

    /// The entry time, if the timestamp is representable
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Whether the message claims to be a checkout, well-formed or not
    #[must_use]
    pub fn is_checkout(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.starts_with(CHECKOUT_PREFIX))
    }

    /// Abbreviated form of `new_id`, or `None` if it is not a usable commit id
    #[must_use]
    pub fn short_new_id(&self) -> Option<&str> {
        short_id(&self.new_id)
    }

    /// The reference HEAD was moved to by this entry
    ///
    /// Returns `None` when the entry is not a checkout (commits, resets and
    /// merges keep HEAD on the same reference) or when it is malformed.
    #[must_use]
    pub fn target(&self) -> Option<RefTarget> {
        let checkout = parse_checkout(self.message.as_deref()?)?;
        classify(checkout.to, &self.new_id)
    }

    /// The reference HEAD was on before this entry moved it
    ///
    /// Like [`ReflogEntry::target`], only checkouts carry this information.
    #[must_use]
    pub fn source(&self) -> Option<RefTarget> {
        let checkout = parse_checkout(self.message.as_deref()?)?;
        classify(checkout.from, &self.old_id)
    }
}

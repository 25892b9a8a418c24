// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Most-recently-used reference resolution
//!
//! Folds HEAD reflog entries into an ordered list of distinct reference names,
//! most recent first. Traversal runs newest to oldest, so the first time a name
//! is seen is its most recent use and every later sighting is dropped.
//!
//! Every entry is credited to the reference HEAD was on when it was written.
//! A checkout credits the reference it moved to and the one it left; any other
//! entry (commit, reset, merge) credits the reference HEAD stayed on, which is
//! known from the current HEAD or from the `from` side of the next newer
//! checkout.

use std::borrow::Borrow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::RecentError;
use crate::reflog::{RefTarget, ReflogEntry};

/// A reference together with the last time HEAD was moved to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRef {
    /// Branch name, or abbreviated commit id for a detached checkout
    pub name: String,
    /// Time of the most recent reflog entry made on or leaving this reference
    pub last_used: DateTime<Utc>,
    /// Whether the reference is a detached commit
    pub detached: bool,
}

/// Resolves the N most recently used references from a HEAD reflog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentRefResolver {
    limit: usize,
}

impl RecentRefResolver {
    /// Create a resolver returning at most `limit` references
    ///
    /// # Errors
    ///
    /// Returns `RecentError::InvalidArgument` if `limit` is zero.
    pub fn new(limit: usize) -> Result<Self, RecentError> {
        if limit == 0 {
            return Err(RecentError::invalid_argument("limit must be positive"));
        }
        Ok(Self { limit })
    }

    /// Create a resolver from a signed count, as typed on a command line
    ///
    /// # Errors
    ///
    /// Returns `RecentError::InvalidArgument` if `limit` is zero or negative.
    pub fn from_signed(limit: i64) -> Result<Self, RecentError> {
        let limit = usize::try_from(limit)
            .map_err(|_| RecentError::invalid_argument(format!("limit must be positive, got {limit}")))?;
        Self::new(limit)
    }

    /// Maximum number of references returned
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resolve reference names from chronological (oldest first) entries
    #[must_use]
    pub fn resolve(&self, entries: &[ReflogEntry]) -> Vec<String> {
        self.resolve_recent(entries)
            .into_iter()
            .map(|r| r.name)
            .collect()
    }

    /// Resolve references with their last-used time from chronological entries
    #[must_use]
    pub fn resolve_recent(&self, entries: &[ReflogEntry]) -> Vec<RecentRef> {
        self.resolve_newest_first(entries.iter().rev())
    }

    /// Resolve from entries already ordered newest first
    ///
    /// Stops pulling from `entries` as soon as `limit` distinct references have
    /// been found, so a lazy reflog reader only materializes what is needed.
    pub fn resolve_newest_first<I>(&self, entries: I) -> Vec<RecentRef>
    where
        I: IntoIterator,
        I::Item: Borrow<ReflogEntry>,
    {
        self.resolve_from_head(None, entries)
    }

    /// Resolve newest-first entries, given the reference HEAD is on now
    ///
    /// `head` is credited with the entries written after the newest checkout.
    /// Pass `None` when it is unknown; those entries are then left uncredited.
    pub fn resolve_from_head<I>(&self, head: Option<RefTarget>, entries: I) -> Vec<RecentRef>
    where
        I: IntoIterator,
        I::Item: Borrow<ReflogEntry>,
    {
        let mut recency = Recency::new(self.limit);
        let mut on = head;

        'entries: for entry in entries {
            let entry = entry.borrow();
            let (moved_to, left) = if entry.is_checkout() {
                let to = entry.target();
                if to.is_none() {
                    debug!(message = ?entry.message, "Skipping malformed checkout entry");
                }
                // Older entries happened on the reference this checkout left.
                on = entry.source();
                (to, on.clone())
            } else {
                trace!(message = ?entry.message, "Entry keeps HEAD on the same reference");
                (on.clone(), None)
            };

            let Some(last_used) = entry.time() else {
                debug!(timestamp = entry.timestamp, "Skipping entry with invalid timestamp");
                continue;
            };
            for target in moved_to.into_iter().chain(left) {
                if recency.credit(target, last_used) {
                    break 'entries;
                }
            }
        }

        debug!(found = recency.recent.len(), limit = self.limit, "Resolved recent references");
        recency.recent
    }
}

/// First-seen references, in the order they were credited
struct Recency {
    limit: usize,
    seen: HashSet<String>,
    recent: Vec<RecentRef>,
}

impl Recency {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            recent: Vec::new(),
        }
    }

    /// Record a use of `target`; returns true once `limit` references are held
    fn credit(&mut self, target: RefTarget, last_used: DateTime<Utc>) -> bool {
        if !self.seen.contains(target.name()) {
            self.seen.insert(target.name().to_string());
            let detached = target.is_detached();
            self.recent.push(RecentRef {
                name: target.into_name(),
                last_used,
                detached,
            });
        }
        self.recent.len() >= self.limit
    }
}

/// Resolve the `limit` most recently used reference names
///
/// `entries` must be in chronological order (oldest first), as the git library
/// stores them.
///
/// # Errors
///
/// Returns `RecentError::InvalidArgument` if `limit` is zero.
pub fn resolve(entries: &[ReflogEntry], limit: usize) -> Result<Vec<String>, RecentError> {
    Ok(RecentRefResolver::new(limit)?.resolve(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn id(n: i64) -> String {
        format!("{:039x}f", n.unsigned_abs())
    }

    fn checkout(t: i64, from: &str, to: &str) -> ReflogEntry {
        ReflogEntry::new(
            t,
            id(t - 1),
            id(t),
            Some(format!("checkout: moving from {from} to {to}")),
        )
    }

    fn commit(t: i64) -> ReflogEntry {
        ReflogEntry::new(t, id(t - 1), id(t), Some("commit: work".to_string()))
    }

    fn branch(name: &str) -> Option<RefTarget> {
        Some(RefTarget::Branch(name.to_string()))
    }

    #[test]
    fn test_most_recent_occurrence_wins() {
        let log = vec![
            commit(1),
            checkout(2, "main", "feature-x"),
            checkout(3, "feature-x", "main"),
        ];
        let names = resolve(&log, 10).unwrap();
        assert_eq!(names, vec!["main".to_string(), "feature-x".to_string()]);
    }

    #[test]
    fn test_empty_reflog() {
        let names = resolve(&[], 5).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_limit_truncates_to_most_recent() {
        let log = vec![commit(1), checkout(2, "a", "b"), checkout(3, "b", "c")];
        let names = resolve(&log, 2).unwrap();
        assert_eq!(names, vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let result = resolve(&[checkout(1, "main", "dev")], 0);
        assert!(matches!(result, Err(RecentError::InvalidArgument { .. })));
    }

    #[test]
    fn test_negative_limit_is_invalid() {
        assert!(matches!(
            RecentRefResolver::from_signed(-3),
            Err(RecentError::InvalidArgument { .. })
        ));
        assert_eq!(RecentRefResolver::from_signed(4).unwrap().limit(), 4);
    }

    #[test]
    fn test_detached_commit_uses_short_id() {
        let detached = ReflogEntry::new(
            5,
            id(4),
            "abc123f0b2d109c17e43de0ce681faec0b7374d0",
            Some("checkout: moving from main to HEAD~3".to_string()),
        );
        let log = vec![commit(1), detached];
        let recent = RecentRefResolver::new(10).unwrap().resolve_recent(&log);
        assert_eq!(recent[0].name, "abc123f");
        assert!(recent[0].detached);
        assert_eq!(recent[1].name, "main");
        assert!(!recent[1].detached);
    }

    #[test]
    fn test_hex_branch_name_is_not_detached() {
        let log = vec![commit(1), checkout(2, "main", "1234")];
        let names = resolve(&log, 10).unwrap();
        assert_eq!(names, vec!["1234".to_string(), "main".to_string()]);
    }

    #[test]
    fn test_branch_left_by_oldest_checkout_is_listed() {
        let log = vec![checkout(1, "main", "feature")];
        let names = resolve(&log, 10).unwrap();
        assert_eq!(names, vec!["feature".to_string(), "main".to_string()]);
    }

    #[test]
    fn test_commits_credit_current_reference() {
        let log = vec![commit(1), commit(2)];
        let resolver = RecentRefResolver::new(10).unwrap();

        let recent = resolver.resolve_from_head(branch("main"), log.iter().rev());
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "main");
        assert_eq!(recent[0].last_used.timestamp(), 2);

        // Without a known HEAD nothing can be attributed.
        assert!(resolver.resolve_newest_first(log.iter().rev()).is_empty());
    }

    #[test]
    fn test_commits_after_checkout_credit_head() {
        let log = vec![commit(1), checkout(2, "main", "dev"), commit(3), commit(4)];
        let recent = RecentRefResolver::new(10)
            .unwrap()
            .resolve_from_head(branch("dev"), log.iter().rev());
        assert_eq!(recent[0].name, "dev");
        assert_eq!(recent[0].last_used.timestamp(), 4);
        assert_eq!(recent[1].name, "main");
        assert_eq!(recent[1].last_used.timestamp(), 2);
    }

    #[test]
    fn test_detached_source_is_listed() {
        let left = id(1);
        let log = vec![ReflogEntry::new(
            2,
            left.clone(),
            id(2),
            Some(format!("checkout: moving from {left} to main")),
        )];
        let recent = RecentRefResolver::new(10).unwrap().resolve_recent(&log);
        assert_eq!(recent[0].name, "main");
        assert_eq!(recent[1].name, &left[..7]);
        assert!(recent[1].detached);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let log = vec![
            commit(1),
            checkout(2, "main", "dev"),
            ReflogEntry::new(3, id(2), id(3), Some("checkout: moving from dev".to_string())),
            ReflogEntry::new(4, id(3), "zz", Some("checkout: moving from dev to HEAD~1".to_string())),
            ReflogEntry::new(5, id(4), id(5), None),
            checkout(6, "dev", "topic"),
        ];
        let names = resolve(&log, 10).unwrap();
        assert_eq!(
            names,
            vec!["topic".to_string(), "dev".to_string(), "main".to_string()]
        );
    }

    #[test]
    fn test_invalid_timestamp_is_skipped() {
        let log = vec![
            commit(1),
            checkout(2, "main", "dev"),
            checkout(i64::MAX, "dev", "broken"),
        ];
        let names = resolve(&log, 10).unwrap();
        assert_eq!(names, vec!["dev".to_string(), "main".to_string()]);
    }

    #[test]
    fn test_last_used_is_most_recent_entry() {
        let log = vec![
            commit(5),
            checkout(10, "main", "dev"),
            checkout(20, "dev", "main"),
            commit(30),
        ];
        let recent = RecentRefResolver::new(10)
            .unwrap()
            .resolve_from_head(branch("main"), log.iter().rev());
        assert_eq!(recent[0].last_used.timestamp(), 30);
        assert_eq!(recent[1].last_used.timestamp(), 20);
    }

    #[test]
    fn test_newest_first_stops_early() {
        let log = vec![
            checkout(3, "b", "c"),
            checkout(2, "a", "b"),
            checkout(1, "main", "a"),
        ];
        let mut pulled = 0;
        let resolver = RecentRefResolver::new(2).unwrap();
        let recent = resolver.resolve_newest_first(log.iter().inspect(|_| pulled += 1));
        assert_eq!(recent.len(), 2);
        assert_eq!(pulled, 1);
    }

    #[test]
    fn test_recreated_branch_is_one_reference() {
        // Same name checked out, deleted, recreated and checked out again.
        let log = vec![
            commit(1),
            checkout(2, "main", "topic"),
            checkout(3, "topic", "main"),
            checkout(4, "main", "topic"),
        ];
        let names = resolve(&log, 10).unwrap();
        assert_eq!(names, vec!["topic".to_string(), "main".to_string()]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let log = vec![
            checkout(1, "main", "a"),
            checkout(2, "a", "b"),
            checkout(3, "b", "a"),
            checkout(4, "a", "c"),
        ];
        let resolver = RecentRefResolver::new(3).unwrap();
        assert_eq!(resolver.resolve(&log), resolver.resolve(&log));
    }
}

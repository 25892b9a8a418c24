// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Last-modifying commit per path
//!
//! Each tracked path remembers the object id it has at HEAD and a queue of
//! commits still worth visiting. While walking history newest first, a commit
//! that holds the same object id pushes the "modifying" commit back and
//! replaces the queue with its own parents; a commit that differs is dropped
//! from the queue. Once the queue is empty the oldest matching commit is the
//! one that introduced the current content.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use git2::Oid;
use serde::{Deserialize, Serialize};

use crate::commit::{Commit, TimeKind};

/// Limits applied while walking history for path changes
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Stop after examining this many commits (HEAD included)
    pub max_commits: Option<usize>,
    /// Stop at the first commit older than this
    pub since: Option<DateTime<Utc>>,
    /// Timestamp compared against `since` and reported
    pub time_kind: TimeKind,
}

impl HistoryOptions {
    /// Examine at most `n` commits
    #[must_use]
    pub fn max_commits(mut self, n: usize) -> Self {
        self.max_commits = Some(n);
        self
    }

    /// Ignore commits older than `date`
    #[must_use]
    pub fn since(mut self, date: DateTime<Utc>) -> Self {
        self.since = Some(date);
        self
    }

    /// Use author or committer time
    #[must_use]
    pub fn time_kind(mut self, kind: TimeKind) -> Self {
        self.time_kind = kind;
        self
    }
}

/// The commit that last modified a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathChange {
    /// Repository-relative path, `/`-separated
    pub path: String,
    /// Last modifying commit, or `None` if the path is not tracked at HEAD
    pub last_change: Option<Commit>,
}

impl PathChange {
    /// Whether the path exists at HEAD
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.last_change.is_some()
    }
}

/// Order changes for display: untracked first, then newest first, then by path
pub fn sort_by_recency(changes: &mut [PathChange]) {
    changes.sort_by(|a, b| match (&a.last_change, &b.last_change) {
        (None, None) => a.path.cmp(&b.path),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y
            .timestamp
            .cmp(&x.timestamp)
            .then_with(|| a.path.cmp(&b.path)),
    });
}

/// Tracking state for one path during a history walk
#[derive(Debug, Clone)]
pub(crate) struct PathTracker {
    pub(crate) path: String,
    entry: Option<Oid>,
    modifying: Option<Oid>,
    pending: Vec<Oid>,
}

impl PathTracker {
    /// Start tracking from HEAD; `entry` is the path's object id at HEAD
    pub(crate) fn start(path: String, entry: Option<Oid>, head: Oid, head_parents: &[Oid]) -> Self {
        let (modifying, pending) = match entry {
            Some(_) => (Some(head), head_parents.to_vec()),
            None => (None, Vec::new()),
        };
        Self {
            path,
            entry,
            modifying,
            pending,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn is_pending(&self, commit: Oid) -> bool {
        self.pending.contains(&commit)
    }

    /// Best-known modifying commit so far
    pub(crate) fn modifying(&self) -> Option<Oid> {
        self.modifying
    }

    /// Feed a commit reached by the walk, with the path's entry id in it
    pub(crate) fn observe(&mut self, commit: Oid, entry: Option<Oid>, parents: &[Oid]) {
        if !self.is_pending(commit) {
            return;
        }
        if entry.is_some() && entry == self.entry {
            self.modifying = Some(commit);
            self.pending = parents.to_vec();
        } else {
            self.pending.retain(|&id| id != commit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use similar_asserts::assert_eq;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    fn change(path: &str, ts: Option<i64>) -> PathChange {
        PathChange {
            path: path.to_string(),
            last_change: ts.map(|ts| Commit {
                sha: "a".repeat(40),
                summary: String::new(),
                author: "Author".to_string(),
                timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
                parents: vec![],
            }),
        }
    }

    #[test]
    fn test_untracked_at_head_is_done() {
        let tracker = PathTracker::start("gone.txt".to_string(), None, oid(1), &[oid(2)]);
        assert!(tracker.is_done());
        assert_eq!(tracker.modifying(), None);
    }

    #[test]
    fn test_root_head_is_done() {
        let tracker = PathTracker::start("a".to_string(), Some(oid(9)), oid(1), &[]);
        assert!(tracker.is_done());
        assert_eq!(tracker.modifying(), Some(oid(1)));
    }

    #[test]
    fn test_unchanged_parent_moves_modifying_back() {
        // 3 <- 2 <- 1 (HEAD); content identical in 2, different in 3
        let mut tracker = PathTracker::start("a".to_string(), Some(oid(9)), oid(1), &[oid(2)]);
        tracker.observe(oid(2), Some(oid(9)), &[oid(3)]);
        assert_eq!(tracker.modifying(), Some(oid(2)));
        assert!(!tracker.is_done());

        tracker.observe(oid(3), Some(oid(8)), &[]);
        assert_eq!(tracker.modifying(), Some(oid(2)));
        assert!(tracker.is_done());
    }

    #[test]
    fn test_path_missing_in_parent() {
        let mut tracker = PathTracker::start("a".to_string(), Some(oid(9)), oid(1), &[oid(2)]);
        tracker.observe(oid(2), None, &[oid(3)]);
        assert!(tracker.is_done());
        assert_eq!(tracker.modifying(), Some(oid(1)));
    }

    #[test]
    fn test_unrelated_commits_are_ignored() {
        let mut tracker = PathTracker::start("a".to_string(), Some(oid(9)), oid(1), &[oid(2)]);
        tracker.observe(oid(7), Some(oid(9)), &[oid(6)]);
        assert_eq!(tracker.modifying(), Some(oid(1)));
        assert!(tracker.is_pending(oid(2)));
    }

    #[test]
    fn test_merge_waits_for_all_parents() {
        let mut tracker =
            PathTracker::start("a".to_string(), Some(oid(9)), oid(1), &[oid(2), oid(3)]);
        tracker.observe(oid(2), Some(oid(8)), &[oid(4)]);
        assert!(!tracker.is_done());
        tracker.observe(oid(3), Some(oid(7)), &[oid(4)]);
        assert!(tracker.is_done());
        assert_eq!(tracker.modifying(), Some(oid(1)));
    }

    #[test]
    fn test_sort_by_recency() {
        let mut changes = vec![
            change("old.rs", Some(100)),
            change("new.rs", Some(300)),
            change("untracked.txt", None),
            change("mid.rs", Some(200)),
            change("also-mid.rs", Some(200)),
        ];
        sort_by_recency(&mut changes);
        let order: Vec<_> = changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(order, vec!["untracked.txt", "new.rs", "also-mid.rs", "mid.rs", "old.rs"]);
    }

    #[test]
    fn test_history_options_builder() {
        let since = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let options = HistoryOptions::default()
            .max_commits(50)
            .since(since)
            .time_kind(TimeKind::Author);
        assert_eq!(options.max_commits, Some(50));
        assert_eq!(options.since, Some(since));
        assert_eq!(options.time_kind, TimeKind::Author);
    }
}

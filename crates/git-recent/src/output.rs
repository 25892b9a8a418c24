// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Rendering of recent references and path changes
//!
//! Text output colors each line by how long ago it was used. Whether colors
//! are emitted is decided globally by `colored` (see [`crate::commands`]).

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use git_recent_core::{PathChange, RecentRef};
use serde::Serialize;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// How recently something was used, for coloring
///
/// Variants are ordered from most to least recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecencyBucket {
    /// Less than a day ago (or in the future)
    Today,
    /// Less than a week ago
    ThisWeek,
    /// A week or more ago
    Older,
}

impl RecencyBucket {
    /// Classify `then` relative to `now`
    #[must_use]
    pub fn of(now: DateTime<Utc>, then: DateTime<Utc>) -> Self {
        let age = (now - then).num_seconds();
        if age < DAY {
            Self::Today
        } else if age < WEEK {
            Self::ThisWeek
        } else {
            Self::Older
        }
    }

    fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Today => text.green(),
            Self::ThisWeek => text.yellow(),
            Self::Older => text.dimmed(),
        }
    }
}

/// Human-readable age such as "3 hours ago"
#[must_use]
pub fn format_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let age = (now - then).num_seconds();
    if age < MINUTE {
        return "just now".to_string();
    }
    let (n, unit) = match age {
        a if a < HOUR => (a / MINUTE, "minute"),
        a if a < DAY => (a / HOUR, "hour"),
        a if a < WEEK => (a / DAY, "day"),
        a if a < MONTH => (a / WEEK, "week"),
        a if a < YEAR => (a / MONTH, "month"),
        a => (a / YEAR, "year"),
    };
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// One reference as emitted in JSON output
#[derive(Debug, Serialize)]
struct RefRecord<'a> {
    name: &'a str,
    last_used: DateTime<Utc>,
    detached: bool,
    current: bool,
}

/// Render references as aligned text lines, marking the current branch
#[must_use]
pub fn render_refs(refs: &[RecentRef], current: Option<&str>, now: DateTime<Utc>) -> String {
    let width = refs.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for r in refs {
        let is_current = current == Some(r.name.as_str());
        let marker = if is_current { "*" } else { " " };
        let padded = format!("{:<width$}", r.name);
        let name = if is_current {
            padded.green().bold()
        } else if r.detached {
            padded.cyan()
        } else {
            padded.normal()
        };
        let bucket = RecencyBucket::of(now, r.last_used);
        let age = bucket.paint(&format_age(now, r.last_used));
        out.push_str(&format!("{marker} {name}  {age}\n"));
    }
    out
}

/// Render references as a JSON array
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_refs_json(refs: &[RecentRef], current: Option<&str>) -> serde_json::Result<String> {
    let records: Vec<_> = refs
        .iter()
        .map(|r| RefRecord {
            name: &r.name,
            last_used: r.last_used,
            detached: r.detached,
            current: current == Some(r.name.as_str()),
        })
        .collect();
    serde_json::to_string_pretty(&records)
}

/// Render path changes as `<age>  <sha>  <path>` lines
#[must_use]
pub fn render_paths(changes: &[PathChange], now: DateTime<Utc>) -> String {
    let ages: Vec<String> = changes
        .iter()
        .map(|c| match &c.last_change {
            Some(commit) => format_age(now, commit.timestamp),
            None => "untracked".to_string(),
        })
        .collect();
    let width = ages.iter().map(|age| age.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (change, age) in changes.iter().zip(&ages) {
        let padded = format!("{age:>width$}");
        let line = match &change.last_change {
            Some(commit) => {
                let bucket = RecencyBucket::of(now, commit.timestamp);
                format!(
                    "{}  {}  {}",
                    bucket.paint(&padded),
                    commit.short_sha().yellow(),
                    change.path
                )
            }
            None => format!("{}  {}  {}", padded.red(), "-------".dimmed(), change.path),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render path changes as a JSON array
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_paths_json(changes: &[PathChange]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(changes)
}

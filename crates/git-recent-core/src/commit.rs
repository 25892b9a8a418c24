//! Commit summaries reported for path history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reflog::SHORT_ID_LEN;

/// Which commit timestamp to compare and report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeKind {
    /// When the commit was created (committer date)
    #[default]
    Commit,
    /// When the change was originally authored
    Author,
}

/// Summary of the commit that last modified a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit SHA (40 hex characters)
    pub sha: String,
    /// First line of the commit message
    pub summary: String,
    /// Author name
    pub author: String,
    /// Commit or author timestamp, depending on the requested [`TimeKind`]
    pub timestamp: DateTime<Utc>,
    /// Parent commit SHAs
    pub parents: Vec<String>,
}

/// Convert a git timestamp, falling back to the epoch if it is out of range
pub(crate) fn git_time(time: git2::Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.seconds(), 0).unwrap_or_default()
}

impl Commit {
    /// Summarize a git2 commit
    #[must_use]
    pub fn from_git2(commit: &git2::Commit<'_>, kind: TimeKind) -> Self {
        let time = match kind {
            TimeKind::Commit => commit.time(),
            TimeKind::Author => commit.author().when(),
        };
        Self {
            sha: commit.id().to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            author: commit.author().name().unwrap_or("Unknown").to_string(),
            timestamp: git_time(time),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        }
    }

    /// Get the short SHA
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..SHORT_ID_LEN.min(self.sha.len())]
    }
}

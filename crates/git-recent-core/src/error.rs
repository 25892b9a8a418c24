// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for git-recent-core

use thiserror::Error;

/// Errors that can occur while resolving recent references or path history
#[derive(Debug, Error)]
pub enum RecentError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// I/O error outside the git library (e.g. listing the working directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No repository found at or above the given path
    #[error("Not a git repository (or any of the parent directories): {path}")]
    NotARepository {
        /// The path that was searched for a repository
        path: String,
    },

    /// A caller-supplied argument was rejected before any work was done
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected
        reason: String,
    },

    /// A path given on the command line is not inside the work tree
    #[error("Path is outside repository: {path}")]
    PathOutsideRepository {
        /// The offending path
        path: String,
    },
}

impl RecentError {
    /// Shorthand for [`RecentError::InvalidArgument`]
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

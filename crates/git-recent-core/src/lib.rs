// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! git-recent-core: recency queries over a git repository
//!
//! This library crate resolves the most recently used references from the
//! HEAD reflog and finds the commit that last modified a set of paths. All
//! object and reflog access is delegated to `git2`.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use git_recent_core::GitRepo;
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! for r in repo.recent_refs(10).expect("resolve refs") {
//!     println!("{} ({})", r.name, r.last_used);
//! }
//! ```

pub mod commit;
pub mod error;
pub mod history;
pub mod reflog;
pub mod repo;
pub mod resolver;

pub use commit::{Commit, TimeKind};
pub use error::RecentError;
pub use history::{HistoryOptions, PathChange, sort_by_recency};
pub use reflog::{RefTarget, ReflogEntry};
pub use repo::GitRepo;
pub use resolver::{RecentRef, RecentRefResolver, resolve};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::{Commit, TimeKind};
    pub use crate::error::RecentError;
    pub use crate::history::{HistoryOptions, PathChange};
    pub use crate::reflog::ReflogEntry;
    pub use crate::repo::GitRepo;
    pub use crate::resolver::{RecentRef, RecentRefResolver};
}

// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository access through `git2`
//!
//! This is the only module that talks to the git library. It opens
//! repositories, reads the HEAD reflog and walks history on behalf of the
//! resolver and the path tracker.

use std::path::{Component, Path, PathBuf};

use git2::{ErrorCode, Oid, Repository, Sort, Tree};
use tracing::{debug, info};

use crate::commit::{Commit, git_time};
use crate::error::RecentError;
use crate::history::{HistoryOptions, PathChange, PathTracker};
use crate::reflog::{RefTarget, ReflogEntry, SHORT_ID_LEN};
use crate::resolver::{RecentRef, RecentRefResolver};

/// A git repository wrapper for recency queries
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `RecentError::NotARepository` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecentError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| RecentError::NotARepository {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `RecentError::NotARepository` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, RecentError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| RecentError::NotARepository {
            path: path.display().to_string(),
        })?;
        debug!(git_dir = %repo.path().display(), "Discovered repository");
        Ok(Self { repo })
    }

    /// Get the repository path (the `.git` directory)
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get the working directory path (None for bare repos)
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Name of the checked-out branch, or `None` if HEAD is detached or unborn
    ///
    /// # Errors
    ///
    /// Returns `RecentError` if HEAD cannot be read.
    pub fn current_branch(&self) -> Result<Option<String>, RecentError> {
        if self.repo.head_detached()? {
            return Ok(None);
        }
        let head = match self.repo.find_reference("HEAD") {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string))
    }

    /// The reference HEAD is on now, or `None` for an unborn branch
    ///
    /// A detached HEAD is reported by its abbreviated commit id.
    ///
    /// # Errors
    ///
    /// Returns `RecentError` if HEAD cannot be read.
    pub fn head_target(&self) -> Result<Option<RefTarget>, RecentError> {
        if !self.repo.head_detached()? {
            return Ok(self.current_branch()?.map(RefTarget::Branch));
        }
        let head = self.repo.head()?;
        Ok(head.target().map(|oid| {
            let mut id = oid.to_string();
            id.truncate(SHORT_ID_LEN);
            RefTarget::Detached(id)
        }))
    }

    /// Read the HEAD reflog in chronological order (oldest first)
    ///
    /// A repository with no HEAD reflog yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RecentError` if the reflog exists but cannot be read.
    pub fn head_reflog(&self) -> Result<Vec<ReflogEntry>, RecentError> {
        let reflog = self.repo.reflog("HEAD")?;
        let mut entries: Vec<ReflogEntry> = reflog.iter().map(|e| to_entry(&e)).collect();
        // git2 yields the newest entry first
        entries.reverse();
        Ok(entries)
    }

    /// The `limit` most recently checked-out references, newest first
    ///
    /// Streams the reflog newest first and stops once `limit` references are
    /// found. Entries that are not checkouts count as uses of the reference
    /// HEAD was on, starting from the current HEAD.
    ///
    /// # Errors
    ///
    /// Returns `RecentError::InvalidArgument` for a zero limit, or a git error
    /// if the reflog cannot be read.
    pub fn recent_refs(&self, limit: usize) -> Result<Vec<RecentRef>, RecentError> {
        let resolver = RecentRefResolver::new(limit)?;
        let head = self.head_target()?;
        let reflog = self.repo.reflog("HEAD")?;
        info!(entries = reflog.len(), limit, head = ?head, "Resolving recent references");
        Ok(resolver.resolve_from_head(head, reflog.iter().map(|e| to_entry(&e))))
    }

    /// Convert a path (relative to `cwd` or absolute) into a repo-relative,
    /// `/`-separated path
    ///
    /// The work-tree root itself maps to the empty path, which
    /// [`GitRepo::path_changes`] treats as the whole tree.
    ///
    /// # Errors
    ///
    /// Returns `RecentError::PathOutsideRepository` if the path is not inside
    /// the work tree, or an I/O error if it cannot be resolved.
    pub fn relative_path(&self, cwd: &Path, path: &Path) -> Result<String, RecentError> {
        let outside = || RecentError::PathOutsideRepository {
            path: path.display().to_string(),
        };
        let workdir = self.workdir().ok_or_else(outside)?.canonicalize()?;
        let absolute = normalize(&cwd.join(path));
        // Resolve symlinks in the parent only, so the path itself may be missing.
        let resolved = match (absolute.parent(), absolute.file_name()) {
            (Some(parent), Some(name)) => parent.canonicalize()?.join(name),
            _ => absolute.canonicalize()?,
        };
        let relative = resolved.strip_prefix(&workdir).map_err(|_| outside())?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.first().is_some_and(|first| first == ".git") {
            return Err(outside());
        }
        Ok(parts.join("/"))
    }

    /// Find the commit that last modified each path
    ///
    /// Paths are repo-relative and `/`-separated; the empty path is the root
    /// tree. The result has one entry per input path, in input order.
    ///
    /// History is walked children before parents. The `since` cutoff compares
    /// committer time, the order of the walk, whatever `time_kind` reports.
    ///
    /// # Errors
    ///
    /// Returns `RecentError` if history cannot be walked.
    pub fn path_changes(
        &self,
        paths: &[String],
        options: &HistoryOptions,
    ) -> Result<Vec<PathChange>, RecentError> {
        let head = match self.repo.head() {
            Ok(head) => head.peel_to_commit()?,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, every path is untracked");
                return Ok(untracked(paths));
            }
            Err(e) => return Err(e.into()),
        };
        let head_tree = head.tree()?;
        let head_parents: Vec<Oid> = head.parent_ids().collect();

        let mut trackers = paths
            .iter()
            .map(|path| {
                let entry = entry_id(&head_tree, path)?;
                Ok::<_, RecentError>(PathTracker::start(
                    path.clone(),
                    entry,
                    head.id(),
                    &head_parents,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        let mut examined = 1usize;
        for oid in revwalk {
            if trackers.iter().all(PathTracker::is_done) {
                break;
            }
            let oid = oid?;
            if oid == head.id() {
                continue;
            }
            if options.max_commits.is_some_and(|max| examined >= max) {
                debug!(examined, "Commit count cutoff reached");
                break;
            }
            examined += 1;

            let commit = self.repo.find_commit(oid)?;
            if let Some(since) = options.since {
                if git_time(commit.time()) < since {
                    debug!(sha = %oid, "Time cutoff reached");
                    break;
                }
            }

            let tree = commit.tree()?;
            let parents: Vec<Oid> = commit.parent_ids().collect();
            for tracker in trackers.iter_mut().filter(|t| t.is_pending(oid)) {
                let entry = entry_id(&tree, &tracker.path)?;
                tracker.observe(oid, entry, &parents);
            }
        }
        info!(paths = paths.len(), examined, "Walked history for path changes");

        trackers
            .into_iter()
            .map(|tracker| {
                let last_change = tracker
                    .modifying()
                    .map(|oid| self.repo.find_commit(oid))
                    .transpose()?
                    .map(|c| Commit::from_git2(&c, options.time_kind));
                Ok::<_, RecentError>(PathChange {
                    path: tracker.path,
                    last_change,
                })
            })
            .collect()
    }
}

fn to_entry(entry: &git2::ReflogEntry<'_>) -> ReflogEntry {
    ReflogEntry {
        timestamp: entry.committer().when().seconds(),
        old_id: entry.id_old().to_string(),
        new_id: entry.id_new().to_string(),
        message: entry.message().map(str::to_string),
    }
}

fn entry_id(tree: &Tree<'_>, path: &str) -> Result<Option<Oid>, RecentError> {
    if path.is_empty() {
        return Ok(Some(tree.id()));
    }
    match tree.get_path(Path::new(path)) {
        Ok(entry) => Ok(Some(entry.id())),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn untracked(paths: &[String]) -> Vec<PathChange> {
    paths
        .iter()
        .map(|path| PathChange {
            path: path.clone(),
            last_change: None,
        })
        .collect()
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_open_nonexistent_repository() {
        let result = GitRepo::open("/nonexistent/path");
        match result {
            Err(RecentError::NotARepository { path }) => {
                assert!(path.contains("nonexistent"));
            }
            _ => panic!("Expected NotARepository error"),
        }
    }

    #[test]
    fn test_discover_nonexistent_repository() {
        let result = GitRepo::discover("/nonexistent/path/deeper");
        assert!(matches!(result, Err(RecentError::NotARepository { .. })));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/a/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_untracked() {
        let changes = untracked(&["a".to_string(), "b".to_string()]);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| !c.is_tracked()));
    }
}

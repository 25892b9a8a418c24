// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command-line configuration for git-recent
//!
//! This module provides the clap-derived configuration, including the start
//! directory, output options and logging flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use git_recent_core::TimeKind;

/// Number of references listed when no count is given
pub const DEFAULT_COUNT: i64 = 10;

/// List recently used git branches, most recent first
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "git-recent")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to listing recent references)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of recent references to list
    #[arg(allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Run as if started in this directory
    ///
    /// The repository is discovered from here, and relative paths given to
    /// `paths` are resolved against it. Defaults to the current directory.
    #[arg(short = 'C', long = "repo", env = "GIT_RECENT_REPO", global = true)]
    pub repo: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// When to color the output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr.
    #[arg(short, long, default_value = "false", global = true)]
    pub verbose: bool,

    /// Quiet mode - only log errors
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List paths ordered by the date of the commit that last modified them
    ///
    /// Without arguments, lists the entries of the current directory.
    Paths(PathsArgs),
}

/// Arguments for the `paths` subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PathsArgs {
    /// Files or directories to report
    pub paths: Vec<PathBuf>,

    /// Include hidden entries when listing the current directory
    #[arg(short, long, default_value = "false")]
    pub all: bool,

    /// Stop after examining this many commits
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_commits: Option<u64>,

    /// Ignore commits older than this many days
    #[arg(long)]
    pub days: Option<u32>,

    /// Which commit timestamp to use
    #[arg(long, value_enum, default_value_t = TimeArg::Commit)]
    pub time: TimeArg,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// A JSON array
    Json,
}

/// Color mode
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when writing to a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Commit timestamp selection
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeArg {
    /// Committer date
    #[default]
    Commit,
    /// Author date
    Author,
}

impl From<TimeArg> for TimeKind {
    fn from(arg: TimeArg) -> Self {
        match arg {
            TimeArg::Commit => TimeKind::Commit,
            TimeArg::Author => TimeKind::Author,
        }
    }
}

impl Config {
    /// Requested reference count, or [`DEFAULT_COUNT`]
    #[must_use]
    pub fn count(&self) -> i64 {
        self.count.unwrap_or(DEFAULT_COUNT)
    }

    /// Directory the command runs from
    ///
    /// Returns `None` if no directory is specified and the current
    /// directory cannot be determined.
    #[must_use]
    pub fn start_dir(&self) -> Option<PathBuf> {
        self.repo.clone().or_else(|| std::env::current_dir().ok())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the `--repo` directory is missing or not a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref repo) = self.repo {
            if !repo.exists() {
                return Err(ConfigError::RepoPathNotFound(repo.clone()));
            }
            if !repo.is_dir() {
                return Err(ConfigError::RepoPathNotDirectory(repo.clone()));
            }
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository directory not found
    #[error("Repository path not found: {0}")]
    RepoPathNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoPathNotDirectory(PathBuf),

    /// The current directory could not be determined
    #[error("Could not determine the current directory")]
    NoWorkingDirectory,
}

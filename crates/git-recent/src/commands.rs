// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command execution
//!
//! Wires the parsed [`Config`] to the core library and the renderers. Output
//! goes to the supplied writer so commands can be driven from tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Duration, Utc};
use git_recent_core::{GitRepo, HistoryOptions, RecentError, RecentRefResolver, sort_by_recency};
use tracing::debug;

use crate::config::{ColorChoice, Command, Config, ConfigError, OutputFormat, PathsArgs};
use crate::output;

/// Exit status for runtime failures such as a missing repository
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for rejected arguments, matching clap's usage errors
pub const EXIT_USAGE: u8 = 2;

/// Run the configured command, writing its output to `out`
///
/// # Errors
///
/// Returns an error if arguments are invalid, no repository is found, or the
/// git library fails.
pub fn run(config: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    apply_color_choice(config.color);
    match &config.command {
        None => run_refs(config, out),
        Some(Command::Paths(args)) => run_paths(config, args, out),
    }
}

/// Map an error from [`run`] to a process exit status
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RecentError>() {
        Some(RecentError::InvalidArgument { .. }) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

fn apply_color_choice(choice: ColorChoice) {
    match choice {
        ColorChoice::Auto => {}
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
    }
}

fn start_dir(config: &Config) -> anyhow::Result<PathBuf> {
    Ok(config.start_dir().ok_or(ConfigError::NoWorkingDirectory)?)
}

fn open_repo(start: &Path) -> anyhow::Result<GitRepo> {
    Ok(GitRepo::discover(start)?)
}

fn run_refs(config: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    // Reject a bad count before touching the repository.
    let resolver = RecentRefResolver::from_signed(config.count())?;
    let start = start_dir(config)?;
    let repo = open_repo(&start)?;

    let refs = repo
        .recent_refs(resolver.limit())
        .context("Failed to read the HEAD reflog")?;
    let current = repo.current_branch()?;
    debug!(count = refs.len(), current = ?current, "Listing recent references");

    let rendered = match config.format {
        OutputFormat::Text => output::render_refs(&refs, current.as_deref(), Utc::now()),
        OutputFormat::Json => output::render_refs_json(&refs, current.as_deref())? + "\n",
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}

fn run_paths(config: &Config, args: &PathsArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let base = start_dir(config)?;
    let repo = open_repo(&base)?;

    let requested = if args.paths.is_empty() {
        list_directory(&base, args.all)?
    } else {
        args.paths.clone()
    };

    let mut display = Vec::with_capacity(requested.len());
    let mut relative = Vec::with_capacity(requested.len());
    for path in &requested {
        let rel = repo
            .relative_path(&base, path)
            .with_context(|| format!("Cannot report {}", path.display()))?;
        display.push(path.display().to_string());
        relative.push(rel);
    }

    let mut options = HistoryOptions::default().time_kind(args.time.into());
    if let Some(max) = args.max_commits {
        options = options.max_commits(usize::try_from(max).unwrap_or(usize::MAX));
    }
    if let Some(days) = args.days {
        options = options.since(Utc::now() - Duration::days(i64::from(days)));
    }

    let mut changes = repo
        .path_changes(&relative, &options)
        .context("Failed to walk history")?;
    for (change, shown) in changes.iter_mut().zip(display) {
        change.path = shown;
    }
    sort_by_recency(&mut changes);

    let rendered = match config.format {
        OutputFormat::Text => output::render_paths(&changes, Utc::now()),
        OutputFormat::Json => output::render_paths_json(&changes)? + "\n",
    };
    out.write_all(rendered.as_bytes())?;
    Ok(())
}

/// Entries of `dir`, sorted by name, skipping `.git` and (unless `all`) any
/// other hidden entry
fn list_directory(dir: &Path, all: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Cannot list {}", dir.display()))? {
        let name = entry?.file_name();
        let hidden = name.to_string_lossy().starts_with('.');
        if name == ".git" || (hidden && !all) {
            continue;
        }
        names.push(PathBuf::from(name));
    }
    names.sort();
    Ok(names)
}

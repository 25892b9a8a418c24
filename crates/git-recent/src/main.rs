//! git-recent: list recently used git branches
//!
//! This binary reads the HEAD reflog of the repository containing the current
//! directory and prints the most recently checked-out references.

use std::io::{self, ErrorKind};
use std::process::ExitCode;

use clap::Parser;
use git_recent::commands::{self, EXIT_FAILURE};
use git_recent::config::Config;
use tracing::debug;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr so they never mix with listed references.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    debug!(?config, "Starting git-recent");

    if let Err(e) = config.validate() {
        eprintln!("git-recent: {e}");
        return ExitCode::from(EXIT_FAILURE);
    }

    let mut stdout = io::stdout().lock();
    match commands::run(&config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e
                .downcast_ref::<io::Error>()
                .is_some_and(|io| io.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("git-recent: {e:#}");
            ExitCode::from(commands::exit_code(&e))
        }
    }
}

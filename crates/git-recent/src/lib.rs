//! git-recent library
//!
//! This module exports the command-line layer of git-recent for use in
//! integration tests and by the binary.

pub mod commands;
pub mod config;
pub mod output;

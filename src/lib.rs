//! rev - a minimal content-addressed version-control engine
//!
//! The library exposes a [`Repository`](areas::repository::Repository) handle whose methods
//! implement the user-facing operations (init, stage, commit, status, log, revert) plus a
//! few plumbing helpers. Nothing in here prints: every operation returns a value or an
//! error and presentation is left to the binary.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the repository marker directory inside the work tree
pub const REPOSITORY_DIR: &str = ".rev";

/// Branch the head points at after `init`
pub const DEFAULT_BRANCH: &str = "main";

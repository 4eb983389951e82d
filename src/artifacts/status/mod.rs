//! Working tree status inspection
//!
//! This module compares the working directory against the index.
//!
//! ## Components
//!
//! - `file_change`: Categories of working-directory changes
//! - `inspector`: Re-hashes staged files to detect changes
//! - `status_info`: The status report returned to callers

pub mod file_change;
pub mod inspector;
pub mod status_info;

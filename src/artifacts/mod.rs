//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `checkout`: Materializing stored trees onto disk
//! - `core`: Shared utilities (atomic file replacement)
//! - `database`: Database entry types
//! - `index`: Index/staging area data structures
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit)
//! - `status`: Working tree status inspection

pub mod checkout;
pub mod core;
pub mod database;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;

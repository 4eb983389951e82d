//! Checkout of stored trees onto disk
//!
//! - `migration`: plans and applies the directory and file writes for a tree

pub mod migration;

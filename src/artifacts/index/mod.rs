//! Index file format
//!
//! The index (staging area) records which blob each tracked path was last staged as.
//!
//! ## File Format
//!
//! ```text
//! <mode> <digest> <mtime> <path>
//! <mode> <digest> <mtime> <path>
//! ...
//! ```
//!
//! Lines are written sorted by path. Lines that fail to parse are skipped on load.

pub mod entry_mode;
pub mod index_entry;

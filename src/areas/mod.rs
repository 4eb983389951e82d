//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area tracking the files of the next commit
//! - `lock`: Exclusive lock held by mutating operations
//! - `refs`: Head and branch references
//! - `repository`: Repository handle tying the areas together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod lock;
pub mod refs;
pub mod repository;
pub mod workspace;

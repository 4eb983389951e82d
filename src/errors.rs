//! Error taxonomy surfaced at the operation boundary
//!
//! Operations return `anyhow::Result` and raise these variants inside the `anyhow::Error`,
//! so callers can recover the kind with `err.downcast_ref::<RevError>()` even after
//! context has been attached on the way up.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevError {
    #[error("rev repository already exists in {0}")]
    RepositoryAlreadyExists(PathBuf),

    #[error("not a rev repository: {0}")]
    RepositoryNotFound(PathBuf),

    #[error("pathspec '{0}' did not match any files")]
    PathNotFound(PathBuf),

    #[error("'{0}' is a directory")]
    PathIsDirectory(PathBuf),

    #[error("'{0}' is outside the repository work tree")]
    PathOutsideRepository(PathBuf),

    #[error("'{0}' cannot be recorded in the index")]
    InvalidPathName(PathBuf),

    #[error("object {0} not found")]
    ObjectNotFound(String),

    #[error("object {0} is corrupt: {1}")]
    CorruptObject(String, String),

    #[error("invalid object digest '{0}'")]
    InvalidDigest(String),

    #[error("object {0} is not a commit")]
    NotACommit(String),

    #[error("object {0} is not a tree")]
    NotATree(String),

    #[error("object {0} is not a blob")]
    NotABlob(String),

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("cannot revert to {0}: no such commit")]
    RevertTargetInvalid(String),
}

/// Extract the taxonomy kind carried by an `anyhow::Error`, if any
pub fn kind_of(error: &anyhow::Error) -> Option<&RevError> {
    error.downcast_ref::<RevError>()
}

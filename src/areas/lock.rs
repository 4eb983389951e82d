//! Repository-wide advisory lock
//!
//! Mutating operations (stage, commit, revert) hold an exclusive lock on `.rev/lock` for
//! their whole duration. The lock is released when the guard is dropped, so every exit
//! path (including `?` early returns) gives it back.

use anyhow::Context;
use file_guard::{FileGuard, Lock};
use std::fs::File;
use std::path::Path;

pub struct RepositoryLock {
    _guard: FileGuard<Box<File>>,
}

impl RepositoryLock {
    /// Block until the exclusive lock on `path` is acquired
    pub fn acquire(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Unable to open lock file {}", path.display()))?;

        let guard = file_guard::lock(Box::new(file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock {}", path.display()))?;
        tracing::debug!(lock = %path.display(), "acquired repository lock");

        Ok(RepositoryLock { _guard: guard })
    }
}

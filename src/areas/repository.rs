use crate::REPOSITORY_DIR;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::lock::RepositoryLock;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::errors::RevError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Handle on one repository, holding every resolved path
///
/// Each operation is a method on this handle; nothing is cached between calls, so the
/// index and refs are always read fresh from disk.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    index_path: Box<Path>,
    lock_path: Box<Path>,
}

impl Repository {
    pub(crate) fn at(path: PathBuf) -> Self {
        let repository_dir = path.join(REPOSITORY_DIR);

        Repository {
            database: Database::new(repository_dir.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(repository_dir.clone().into_boxed_path()),
            index_path: repository_dir.join("index").into_boxed_path(),
            lock_path: repository_dir.join("lock").into_boxed_path(),
            path: path.into_boxed_path(),
        }
    }

    /// Open the repository whose work tree is `path`
    ///
    /// The `.rev` directory must sit directly under `path`; parents are not searched.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.join(REPOSITORY_DIR).is_dir() {
            return Err(RevError::RepositoryNotFound(path.to_path_buf()).into());
        }

        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", path.display()))?;
        tracing::debug!(path = %path.display(), "opened repository");

        Ok(Self::at(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repository_dir(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// The staging area as currently stored on disk
    pub fn index(&self) -> anyhow::Result<Index> {
        let mut index = Index::new(self.index_path.clone());
        index.load()?;

        Ok(index)
    }

    /// Take the exclusive repository lock for the duration of a mutating operation
    pub fn lock(&self) -> anyhow::Result<RepositoryLock> {
        RepositoryLock::acquire(&self.lock_path)
    }
}

use crate::areas::repository::Repository;
use crate::errors::RevError;
use crate::{DEFAULT_BRANCH, REPOSITORY_DIR};
use anyhow::Context;
use std::fs;
use std::path::Path;

impl Repository {
    /// Create an empty repository in `path`, creating the directory if needed
    pub fn init(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", path.display()))?;

        if path.join(REPOSITORY_DIR).exists() {
            return Err(RevError::RepositoryAlreadyExists(path).into());
        }

        let repository = Repository::at(path);

        fs::create_dir_all(repository.database().objects_path())
            .context("Failed to create .rev/objects directory")?;
        repository
            .refs()
            .init_head(DEFAULT_BRANCH)
            .context("Failed to create initial head reference")?;
        repository
            .index()?
            .save()
            .context("Failed to create .rev/index file")?;

        tracing::info!(path = %repository.path().display(), "initialized empty repository");

        Ok(repository)
    }
}
